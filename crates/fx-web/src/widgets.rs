use crate::constants::{ATTR_EXPANDED, ATTR_PANEL, ATTR_SLIDE, CAROUSEL_TICK_MS};
use crate::dom::{element_by_id, query_all, Listener};
use crate::overlay;
use fx_core::{Carousel, PanelSet};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Toggle every `[data-panel]` element under `root` on click. Elements that
/// start with `data-expanded="true"` begin expanded.
pub fn wire_panel_toggles(root_id: &str) -> anyhow::Result<usize> {
    let root = element_by_id(root_id)?;
    let panels = query_all(&root, &format!("[{}]", ATTR_PANEL));
    let initially: Vec<String> = panels
        .iter()
        .filter(|el| el.get_attribute(ATTR_EXPANDED).as_deref() == Some("true"))
        .filter_map(|el| el.get_attribute(ATTR_PANEL))
        .collect();
    let set = Rc::new(RefCell::new(PanelSet::new(initially.iter().map(String::as_str))));

    for el in panels.iter() {
        let Some(name) = el.get_attribute(ATTR_PANEL) else {
            continue;
        };
        overlay::set_expanded(el, set.borrow().is_expanded(&name));
        let set = set.clone();
        let target = el.clone();
        let closure = Closure::wrap(Box::new(move || {
            let expanded = set.borrow_mut().toggle(&name);
            overlay::set_expanded(&target, expanded);
        }) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    log::info!("[panels] wired {} panels under #{}", panels.len(), root_id);
    Ok(panels.len())
}

/// Device carousel bound to `root`: `data-index`/`data-direction` on the
/// root, hover pauses, `[data-slide]` children jump.
#[wasm_bindgen]
pub struct CarouselHandle {
    carousel: Rc<RefCell<Carousel>>,
    root: web::Element,
    window: web::Window,
    interval: Cell<Option<i32>>,
    _tick: Closure<dyn FnMut()>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl CarouselHandle {
    pub fn index(&self) -> usize {
        self.carousel.borrow().index()
    }

    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&self, index: usize) -> bool {
        go_to(&self.carousel, &self.root, index)
    }

    /// Stop auto-advancing. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.interval.take() {
            self.window.clear_interval_with_handle(id);
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn go_to(carousel: &RefCell<Carousel>, root: &web::Element, index: usize) -> bool {
    let mut c = carousel.borrow_mut();
    if !c.go_to(index) {
        return false;
    }
    overlay::set_slide(root, c.index(), c.direction());
    true
}

pub fn start_carousel(root_id: &str, len: usize) -> anyhow::Result<CarouselHandle> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let root = element_by_id(root_id)?;
    let carousel = Rc::new(RefCell::new(Carousel::new(len)));
    overlay::set_slide(&root, 0, 0);

    let tick = {
        let carousel = carousel.clone();
        let root = root.clone();
        let mut last = Instant::now();
        Closure::wrap(Box::new(move || {
            let now = Instant::now();
            let dt_ms = now.duration_since(last).as_secs_f32() * 1000.0;
            last = now;
            let mut c = carousel.borrow_mut();
            if c.advance(dt_ms) {
                overlay::set_slide(&root, c.index(), c.direction());
            }
        }) as Box<dyn FnMut()>)
    };
    let interval = window
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), CAROUSEL_TICK_MS)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let target: &web::EventTarget = root.as_ref();
    let mut listeners = Vec::new();
    for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
        let carousel = carousel.clone();
        listeners.push(Listener::new(target, event, move |_| {
            carousel.borrow_mut().set_hovered(hovered)
        }));
    }
    for dot in query_all(&root, &format!("[{}]", ATTR_SLIDE)) {
        let Some(index) = dot.get_attribute(ATTR_SLIDE).and_then(|v| v.parse::<usize>().ok()) else {
            continue;
        };
        let carousel = carousel.clone();
        let root = root.clone();
        listeners.push(Listener::new(dot.as_ref(), "click", move |_| {
            go_to(&carousel, &root, index);
        }));
    }

    log::info!("[carousel] #{} with {} slides", root_id, len);
    Ok(CarouselHandle {
        carousel,
        root,
        window,
        interval: Cell::new(Some(interval)),
        _tick: tick,
        _listeners: listeners,
    })
}
