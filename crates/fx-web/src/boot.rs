use crate::constants::{ATTR_LINE_STYLE, ATTR_PROGRESS, BOOT_TICK_MS};
use crate::dom::{element_by_id, window_document, Listener};
use crate::overlay;
use crate::session::BrowserSessionStore;
use fx_core::reveal::{progress, visible_lines, BootLine, LineStyle, BOOT_LINES};
use fx_core::{BootController, Completion, BOOT_TOTAL_MS};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct BootState {
    controller: RefCell<BootController<BrowserSessionStore>>,
    window: web::Window,
    document: web::Document,
    splash: web::Element,
    lines: web::Element,
    progress_bar: Option<web::Element>,
    started: Instant,
    shown: Cell<usize>,
    ticker: Cell<Option<i32>>,
}

/// Live boot splash. Dropping it stops the line ticker and removes the skip
/// listener.
#[wasm_bindgen]
pub struct BootHandle {
    state: Rc<BootState>,
    _tick: Option<Closure<dyn FnMut()>>,
    _skip: Option<Listener>,
}

impl Drop for BootHandle {
    fn drop(&mut self) {
        stop_ticker(&self.state);
    }
}

#[wasm_bindgen]
impl BootHandle {
    /// Same as clicking the skip button.
    pub fn skip(&self) {
        skip(&self.state);
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.state.controller.borrow().is_complete()
    }
}

fn line_style_name(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Highlight => "highlight",
        LineStyle::Ok => "ok",
        LineStyle::Muted => "muted",
        LineStyle::Normal => "normal",
    }
}

fn set_timeout(window: &web::Window, delay_ms: u32, f: impl FnOnce() + 'static) -> Option<i32> {
    let callback = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms as i32)
        .map_err(|e| log::warn!("[boot] setTimeout failed: {:?}", e))
        .ok()
}

fn append_line(document: &web::Document, lines: &web::Element, line: &BootLine) {
    let Ok(el) = document.create_element("div") else {
        return;
    };
    el.set_text_content(Some(line.text));
    let _ = el.set_attribute(ATTR_LINE_STYLE, line_style_name(line.style()));
    if line.text.is_empty() {
        let _ = el.set_attribute("style", "min-height:1rem");
    }
    let _ = lines.append_child(&el);
    lines.set_scroll_top(lines.scroll_height());
}

fn stop_ticker(state: &BootState) {
    if let Some(id) = state.ticker.take() {
        state.window.clear_interval_with_handle(id);
    }
}

/// Show the lines due by now and move the progress bar. Stops itself once
/// the bar is full or the splash was dismissed.
fn tick(state: &BootState) {
    if state.controller.borrow().is_complete() {
        stop_ticker(state);
        return;
    }
    let elapsed = state.started.elapsed().as_secs_f64() * 1000.0;
    let due = visible_lines(elapsed);
    let shown = state.shown.get();
    if due > shown {
        for line in BOOT_LINES[shown..due].iter() {
            append_line(&state.document, &state.lines, line);
        }
        state.shown.set(due);
    }
    let fill = progress(elapsed);
    if let Some(bar) = state.progress_bar.as_ref() {
        let _ = bar.set_attribute("style", &format!("width:{:.1}%", fill * 100.0));
    }
    if fill >= 1.0 {
        stop_ticker(state);
    }
}

fn skip(state: &BootState) {
    let Some(timers) = state.controller.borrow_mut().skip() else {
        return;
    };
    stop_ticker(state);
    for id in timers {
        state.window.clear_timeout_with_handle(id);
    }
}

/// Run the boot splash unless this session already saw it.
///
/// Lines appear on their schedule and a `[data-progress]` element inside the
/// splash, if present, fills linearly. After the full boot time the splash
/// fades and `on_complete` runs. The skip button cancels every pending timer
/// and completes at once.
pub fn start_boot(splash_id: &str, lines_id: &str, skip_id: &str, on_complete: js_sys::Function) -> anyhow::Result<BootHandle> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let splash = element_by_id(splash_id)?;
    let lines = element_by_id(lines_id)?;

    let complete = {
        let splash = splash.clone();
        move || {
            overlay::hide(&splash);
            // Deferred so the callback can query the handle.
            spawn_local(async move {
                if let Err(e) = on_complete.call0(&JsValue::NULL) {
                    log::warn!("[boot] on_complete threw: {:?}", e);
                }
            });
        }
    };
    let controller = BootController::start(BrowserSessionStore::new(), complete);
    let already_done = controller.is_complete();
    let progress_bar = splash
        .query_selector(&format!("[{}]", ATTR_PROGRESS))
        .ok()
        .flatten();
    let state = Rc::new(BootState {
        controller: RefCell::new(controller),
        window: window.clone(),
        document,
        splash: splash.clone(),
        lines,
        progress_bar,
        started: Instant::now(),
        shown: Cell::new(0),
        ticker: Cell::new(None),
    });
    if already_done {
        return Ok(BootHandle {
            state,
            _tick: None,
            _skip: None,
        });
    }

    overlay::show(&splash);
    state.lines.set_inner_html("");
    let tick_closure = {
        let st = state.clone();
        Closure::wrap(Box::new(move || tick(&st)) as Box<dyn FnMut()>)
    };
    match window.set_interval_with_callback_and_timeout_and_arguments_0(tick_closure.as_ref().unchecked_ref(), BOOT_TICK_MS) {
        Ok(id) => state.ticker.set(Some(id)),
        Err(e) => log::warn!("[boot] setInterval failed: {:?}", e),
    }
    tick(&state);

    let st = state.clone();
    let done_timer = set_timeout(&window, BOOT_TOTAL_MS, move || {
        let completion = st.controller.borrow_mut().complete_by_timer();
        let Some(Completion::AfterFade { fade_ms }) = completion else {
            return;
        };
        overlay::fade(&st.splash);
        let fade_state = st.clone();
        if let Some(id) = set_timeout(&st.window, fade_ms, move || fade_state.controller.borrow_mut().finish()) {
            st.controller.borrow_mut().track_timer(id);
        }
    });
    if let Some(id) = done_timer {
        state.controller.borrow_mut().track_timer(id);
    }

    let skip_listener = match element_by_id(skip_id) {
        Ok(button) => {
            let st = state.clone();
            Some(Listener::new(button.as_ref(), "click", move |_| skip(&st)))
        }
        Err(e) => {
            log::warn!("[boot] no skip button: {}", e);
            None
        }
    };

    Ok(BootHandle {
        state,
        _tick: Some(tick_closure),
        _skip: skip_listener,
    })
}
