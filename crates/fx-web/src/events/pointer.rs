use crate::dom::Listener;
use crate::mount::SceneSlot;
use fx_core::{client_to_surface, PointerInput, PointerTracker};
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Map a mouse event into the pixel space of `canvas`'s backing store.
#[inline]
pub fn pointer_surface_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_surface(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}

/// Feed enter/move/leave on `container` into the scene's pointer tracker.
/// Every event is also recorded in `input` so a scene that is still loading
/// picks up the current pointer state when it starts.
pub fn wire_pointer(
    container: &web::Element,
    canvas: &web::HtmlCanvasElement,
    slot: &SceneSlot,
    input: &Rc<Cell<PointerInput>>,
) -> Vec<Listener> {
    let target: &web::EventTarget = container.as_ref();

    let (enter_slot, enter_input) = (slot.clone(), input.clone());
    let enter = Listener::new(target, "mouseenter", move |_| {
        record(&enter_input, |i| i.on_enter());
        with_tracker(&enter_slot, |tracker| tracker.on_enter());
    });

    let (move_slot, move_input) = (slot.clone(), input.clone());
    let move_canvas = canvas.clone();
    let mv = Listener::new(target, "mousemove", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        let p = pointer_surface_px(ev, &move_canvas);
        record(&move_input, |i| i.on_move(p.x, p.y));
        with_tracker(&move_slot, |tracker| tracker.on_move(p.x, p.y));
    });

    let (leave_slot, leave_input) = (slot.clone(), input.clone());
    let leave = Listener::new(target, "mouseleave", move |_| {
        record(&leave_input, |i| i.on_leave());
        with_tracker(&leave_slot, |tracker| tracker.on_leave());
    });

    vec![enter, mv, leave]
}

fn record(input: &Cell<PointerInput>, f: impl FnOnce(&mut PointerInput)) {
    let mut current = input.get();
    f(&mut current);
    input.set(current);
}

fn with_tracker(slot: &SceneSlot, f: impl FnOnce(&mut PointerTracker)) {
    // A frame may hold the slot; events are single-threaded so this only
    // fails if an event is dispatched from inside a tick.
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(tracker) = guard.as_mut().and_then(|scene| scene.effect.pointer_mut()) {
        f(tracker);
    }
}
