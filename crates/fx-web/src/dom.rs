use crate::constants::DPR_CAP;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn element_by_id(id: &str) -> anyhow::Result<web::Element> {
    window_document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))
}

pub fn canvas_by_id(id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    element_by_id(id)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", id, e))
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, DPR_CAP)
}

/// Size the canvas backing store to `css_w x css_h` at the capped DPR and
/// pin its CSS size. Returns the pixel size and the scale.
pub fn size_canvas(canvas: &web::HtmlCanvasElement, css_w: f64, css_h: f64) -> (u32, u32, f32) {
    let dpr = device_pixel_ratio();
    let w_px = ((css_w * dpr) as u32).max(1);
    let h_px = ((css_h * dpr) as u32).max(1);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    let _ = canvas.set_attribute("style", &format!("width:{}px;height:{}px", css_w, css_h));
    (w_px, h_px, dpr as f32)
}

/// Match the backing store to the element's laid-out size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32, f32) {
    let dpr = device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    (w_px, h_px, dpr as f32)
}

/// An event listener that is removed again on drop.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(target: &web::EventTarget, event: &'static str, handler: impl FnMut(web::Event) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            log::warn!("[dom] add {} listener failed: {:?}", event, e);
        }
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// All elements under `root` matching `selector`.
pub fn query_all(root: &web::Element, selector: &str) -> Vec<web::Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect()
}
