#![cfg(target_arch = "wasm32")]
// Browser tests for the DOM bindings: mount bookkeeping, session storage,
// boot completion, panels and the carousel.

use fx_core::SessionStore;
use fx_web::{boot_sequence, is_mounted, mount_carousel, mount_signal_monitor, wire_panels, BrowserSessionStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append(tag: &str, id: &str) -> web_sys::Element {
    let doc = document();
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let el = doc.create_element(tag).unwrap();
    el.set_id(id);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn flush_microtasks() {
    JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await.unwrap();
}

#[wasm_bindgen_test]
fn monitor_sizes_canvas_and_registers() {
    append("canvas", "t-monitor");
    let handle = mount_signal_monitor("t-monitor").unwrap();
    assert!(is_mounted("t-monitor"));
    let canvas: web_sys::HtmlCanvasElement = document()
        .get_element_by_id("t-monitor")
        .unwrap()
        .dyn_into()
        .unwrap();
    assert!(canvas.width() >= 400 && canvas.height() >= 500);
    handle.unmount();
    assert!(!is_mounted("t-monitor"));
    handle.unmount();
}

#[wasm_bindgen_test]
fn remount_replaces_previous_mount() {
    append("canvas", "t-remount");
    let first = mount_signal_monitor("t-remount").unwrap();
    let second = mount_signal_monitor("t-remount").unwrap();
    assert!(!first.is_mounted());
    assert!(second.is_mounted());
    // a stale handle leaves the newer mount alone
    first.unmount();
    assert!(second.is_mounted());
    second.unmount();
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error() {
    assert!(mount_signal_monitor("t-does-not-exist").is_err());
}

#[wasm_bindgen_test]
fn session_store_round_trips_through_session_storage() {
    let mut store = BrowserSessionStore::new();
    store.set_flag("fx-test-flag", true);
    assert!(store.get_flag("fx-test-flag"));
    store.set_flag("fx-test-flag", false);
    assert!(!store.get_flag("fx-test-flag"));
}

#[wasm_bindgen_test(async)]
async fn booted_session_completes_without_splash_lines() {
    let mut store = BrowserSessionStore::new();
    store.set_flag(fx_core::BOOT_FLAG_KEY, true);
    append("div", "t-splash");
    let lines = append("div", "t-lines");
    append("button", "t-skip");

    let counter = js_sys::Function::new_no_args("window.__fxBooted = (window.__fxBooted || 0) + 1;");
    let handle = boot_sequence("t-splash", "t-lines", "t-skip", counter).unwrap();
    assert!(handle.is_complete());
    flush_microtasks().await;

    let window = web_sys::window().unwrap();
    let count = js_sys::Reflect::get(&window, &JsValue::from_str("__fxBooted")).unwrap();
    assert_eq!(count.as_f64(), Some(1.0));
    assert_eq!(lines.child_element_count(), 0);
}

#[wasm_bindgen_test(async)]
async fn skip_completes_a_fresh_session_once() {
    let mut store = BrowserSessionStore::new();
    store.set_flag(fx_core::BOOT_FLAG_KEY, false);
    let splash = append("div", "t-splash2");
    append("div", "t-lines2");
    append("button", "t-skip2");

    let counter = js_sys::Function::new_no_args("window.__fxSkipped = (window.__fxSkipped || 0) + 1;");
    let handle = boot_sequence("t-splash2", "t-lines2", "t-skip2", counter).unwrap();
    assert!(!handle.is_complete());
    handle.skip();
    handle.skip();
    flush_microtasks().await;

    let window = web_sys::window().unwrap();
    let count = js_sys::Reflect::get(&window, &JsValue::from_str("__fxSkipped")).unwrap();
    assert_eq!(count.as_f64(), Some(1.0));
    assert!(BrowserSessionStore::new().get_flag(fx_core::BOOT_FLAG_KEY));
    assert!(splash.get_attribute("style").unwrap_or_default().contains("display:none"));
}

#[wasm_bindgen_test(async)]
async fn fresh_boot_fills_progress_bar_and_shows_lines() {
    let mut store = BrowserSessionStore::new();
    store.set_flag(fx_core::BOOT_FLAG_KEY, false);
    let splash = append("div", "t-splash3");
    splash.set_inner_html(r#"<div data-progress></div>"#);
    let lines = append("div", "t-lines3");
    append("button", "t-skip3");

    let noop = js_sys::Function::new_no_args("");
    let handle = boot_sequence("t-splash3", "t-lines3", "t-skip3", noop).unwrap();
    // line 0 is due immediately
    assert!(lines.child_element_count() >= 1);

    sleep(600).await;
    let bar = splash.query_selector("[data-progress]").unwrap().unwrap();
    let style = bar.get_attribute("style").unwrap_or_default();
    let pct: f32 = style
        .trim_start_matches("width:")
        .trim_end_matches('%')
        .parse()
        .unwrap();
    assert!(pct > 10.0 && pct < 100.0, "width {}", style);
    // lines due by 500 ms: delays 0, 100, 180, 250, 350, 420, 500
    assert!(lines.child_element_count() >= 7);

    handle.skip();
    let frozen = bar.get_attribute("style");
    sleep(200).await;
    assert_eq!(bar.get_attribute("style"), frozen);
}

#[wasm_bindgen_test]
fn panels_toggle_on_click() {
    let root = append("div", "t-panels");
    root.set_inner_html(r#"<div data-panel="a"></div><div data-panel="b" data-expanded="true"></div>"#);
    assert_eq!(wire_panels("t-panels").unwrap(), 2);

    let a: web_sys::HtmlElement = root.query_selector("[data-panel=a]").unwrap().unwrap().dyn_into().unwrap();
    let b = root.query_selector("[data-panel=b]").unwrap().unwrap();
    assert_eq!(a.get_attribute("data-expanded").as_deref(), Some("false"));
    assert_eq!(b.get_attribute("data-expanded").as_deref(), Some("true"));
    a.click();
    assert_eq!(a.get_attribute("data-expanded").as_deref(), Some("true"));
    a.click();
    assert_eq!(a.get_attribute("data-expanded").as_deref(), Some("false"));
}

#[wasm_bindgen_test]
fn carousel_records_index_and_direction() {
    let root = append("div", "t-carousel");
    let handle = mount_carousel("t-carousel", 3).unwrap();
    assert_eq!(root.get_attribute("data-index").as_deref(), Some("0"));
    assert!(handle.go_to(2));
    assert_eq!(root.get_attribute("data-index").as_deref(), Some("2"));
    assert_eq!(root.get_attribute("data-direction").as_deref(), Some("1"));
    assert!(handle.go_to(0));
    assert_eq!(root.get_attribute("data-direction").as_deref(), Some("-1"));
    assert!(!handle.go_to(7));
    handle.stop();
}
