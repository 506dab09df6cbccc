use crate::canvas::rasterize_image;
use fx_core::Surface;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetch and decode `url` as a CORS-clean image.
pub async fn load_image(url: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("decode {} failed: {:?}", url, e))?;
    Ok(img)
}

/// Load `url` and rasterize it at its natural size times `dpr`.
///
/// Returns `Ok(None)` when `alive` was cleared while the load was in flight;
/// the caller was torn down and nothing should be drawn.
pub async fn load_surface(url: &str, dpr: f32, alive: &Rc<Cell<bool>>) -> anyhow::Result<Option<Surface>> {
    let img = load_image(url).await?;
    if !alive.get() {
        log::debug!("[image] {} loaded after teardown; dropping", url);
        return Ok(None);
    }
    let w = ((img.natural_width() as f32 * dpr) as u32).max(1);
    let h = ((img.natural_height() as f32 * dpr) as u32).max(1);
    rasterize_image(&img, w, h).map(Some)
}
