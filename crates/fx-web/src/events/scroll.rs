use crate::dom::Listener;
use crate::mount::SceneSlot;
use web_sys as web;

/// Page scroll progress in [0, 1]. A page that cannot scroll reports 0.
pub fn scroll_progress(window: &web::Window) -> f32 {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let content = window
        .document()
        .and_then(|d| d.body())
        .map(|b| b.scroll_height() as f64)
        .unwrap_or(0.0);
    let range = content - viewport;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0) as f32
}

fn push_progress(window: &web::Window, slot: &SceneSlot) {
    let progress = scroll_progress(window);
    if let Ok(mut guard) = slot.try_borrow_mut() {
        if let Some(scene) = guard.as_mut() {
            scene.effect.set_scroll_progress(progress);
        }
    }
}

/// Forward window scroll into the scene. The current position is pushed once
/// immediately.
pub fn wire_scroll(window: &web::Window, slot: &SceneSlot) -> Listener {
    push_progress(window, slot);
    let win = window.clone();
    let slot = slot.clone();
    Listener::new(window.as_ref(), "scroll", move |_| push_progress(&win, &slot))
}
