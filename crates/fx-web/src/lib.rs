#![cfg(target_arch = "wasm32")]
mod boot;
mod canvas;
pub mod constants;
mod dom;
mod events;
mod frame;
mod image;
mod mount;
mod overlay;
mod session;
mod widgets;

use canvas::SurfaceHandle;
use fx_core::{CodeLens, CodeLensConfig, GlyphMatrix, GlyphMatrixConfig, MonitorConfig, SignalMonitor, Surface};
use mount::{replace_mount, start_scene, Mount, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub use boot::BootHandle;
pub use frame::RafDriver;
pub use mount::EffectHandle;
pub use session::BrowserSessionStore;
pub use widgets::CarouselHandle;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fx-web starting");
    Ok(())
}

#[inline]
fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

/// Acquire a 2D context or log why the effect stays absent.
fn acquire_or_log(canvas: &web::HtmlCanvasElement, canvas_id: &str) -> Option<canvas::CanvasTarget> {
    match SurfaceHandle::acquire(canvas) {
        SurfaceHandle::Ready(target) => Some(target),
        SurfaceHandle::Unavailable(reason) => {
            log::warn!("[mount] #{}: {}; effect disabled", canvas_id, reason);
            None
        }
    }
}

/// Oscilloscope panel on a fixed 400x500 canvas.
#[wasm_bindgen]
pub fn mount_signal_monitor(canvas_id: &str) -> Result<EffectHandle, JsValue> {
    let canvas = dom::canvas_by_id(canvas_id).map_err(to_js)?;
    replace_mount(canvas_id, |mount| {
        let config = MonitorConfig::default();
        let (w, h, dpr) = dom::size_canvas(&canvas, config.width as f64, config.height as f64);
        let Some(target) = acquire_or_log(&canvas, canvas_id) else {
            return Ok(());
        };
        let surface = Surface::new(w, h)?.with_scale(dpr);
        let effect = SignalMonitor::new(config, &mut StdRng::from_entropy())?;
        start_scene(
            &mount.driver,
            &mount.scene,
            &mount.input,
            Scene {
                effect: Box::new(effect),
                surface,
                target,
            },
        );
        Ok(())
    })
    .map_err(to_js)
}

/// Page-wide glyph background. Follows window resizes and page scroll.
#[wasm_bindgen]
pub fn mount_glyph_matrix(canvas_id: &str) -> Result<EffectHandle, JsValue> {
    let canvas = dom::canvas_by_id(canvas_id).map_err(to_js)?;
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    replace_mount(canvas_id, |mount| {
        let (w, h, dpr) = dom::sync_canvas_backing_size(&canvas);
        let Some(target) = acquire_or_log(&canvas, canvas_id) else {
            return Ok(());
        };
        let surface = Surface::new(w, h)?.with_scale(dpr);
        let effect = GlyphMatrix::new(GlyphMatrixConfig::default(), &mut StdRng::from_entropy())?;
        start_scene(
            &mount.driver,
            &mount.scene,
            &mount.input,
            Scene {
                effect: Box::new(effect),
                surface,
                target,
            },
        );
        mount.listeners.push(events::wire_scroll(&window, &mount.scene));
        mount.listeners.push(wire_resize(&window, &canvas, mount));
        Ok(())
    })
    .map_err(to_js)
}

fn wire_resize(window: &web::Window, canvas: &web::HtmlCanvasElement, mount: &Mount) -> dom::Listener {
    let canvas = canvas.clone();
    let slot = mount.scene.clone();
    dom::Listener::new(window.as_ref(), "resize", move |_| {
        let (w, h, dpr) = dom::sync_canvas_backing_size(&canvas);
        let Ok(mut guard) = slot.try_borrow_mut() else {
            return;
        };
        let Some(scene) = guard.as_mut() else {
            return;
        };
        match Surface::new(w, h) {
            Ok(surface) => scene.surface = surface.with_scale(dpr),
            Err(e) => log::warn!("[resize] {}", e),
        }
    })
}

/// Hover lens over a portrait. Nothing is drawn until `image_url` has
/// loaded; a failed load leaves the effect absent.
#[wasm_bindgen]
pub fn mount_code_lens(container_id: &str, canvas_id: &str, image_url: &str) -> Result<EffectHandle, JsValue> {
    let container = dom::element_by_id(container_id).map_err(to_js)?;
    let canvas = dom::canvas_by_id(canvas_id).map_err(to_js)?;
    let url = image_url.to_string();
    let id = canvas_id.to_string();
    replace_mount(canvas_id, |mount| {
        mount
            .listeners
            .extend(events::wire_pointer(&container, &canvas, &mount.scene, &mount.input));
        let driver = mount.driver.clone();
        let input = mount.input.clone();
        let slot = mount.scene.clone();
        let alive = mount.alive.clone();
        let dpr = dom::device_pixel_ratio() as f32;
        spawn_local(async move {
            let base = match image::load_surface(&url, dpr, &alive).await {
                Ok(Some(base)) => base,
                Ok(None) => return,
                Err(e) => {
                    log::warn!("[lens] {:#}; effect disabled", e);
                    return;
                }
            };
            if !alive.get() {
                return;
            }
            canvas.set_width(base.width());
            canvas.set_height(base.height());
            let Some(target) = acquire_or_log(&canvas, &id) else {
                return;
            };
            let surface = match Surface::new(base.width(), base.height()) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("[lens] {}", e);
                    return;
                }
            };
            match CodeLens::new(base, CodeLensConfig::default(), &mut StdRng::from_entropy()) {
                Ok(lens) => start_scene(
                    &driver,
                    &slot,
                    &input,
                    Scene {
                        effect: Box::new(lens),
                        surface,
                        target,
                    },
                ),
                Err(e) => log::warn!("[lens] {}", e),
            }
        });
        Ok(())
    })
    .map_err(to_js)
}

/// Terminal boot splash. `on_complete` runs once per session, immediately
/// when this session already booted.
#[wasm_bindgen]
pub fn boot_sequence(splash_id: &str, lines_id: &str, skip_id: &str, on_complete: js_sys::Function) -> Result<BootHandle, JsValue> {
    boot::start_boot(splash_id, lines_id, skip_id, on_complete).map_err(to_js)
}

/// Returns how many panels were wired.
#[wasm_bindgen]
pub fn wire_panels(root_id: &str) -> Result<usize, JsValue> {
    widgets::wire_panel_toggles(root_id).map_err(to_js)
}

#[wasm_bindgen]
pub fn mount_carousel(root_id: &str, len: usize) -> Result<CarouselHandle, JsValue> {
    widgets::start_carousel(root_id, len).map_err(to_js)
}

/// Whether an effect is currently mounted on `canvas_id`.
#[wasm_bindgen]
pub fn is_mounted(canvas_id: &str) -> bool {
    mount::is_mounted(canvas_id)
}
