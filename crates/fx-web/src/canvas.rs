use fx_core::Surface;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

/// A canvas with its 2D context, or the reason none could be obtained.
/// Effects mounted on an `Unavailable` handle do nothing.
pub enum SurfaceHandle {
    Ready(CanvasTarget),
    Unavailable(&'static str),
}

pub struct CanvasTarget {
    pub canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl SurfaceHandle {
    pub fn acquire(canvas: &web::HtmlCanvasElement) -> Self {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj,
            Ok(None) => return SurfaceHandle::Unavailable("2d context not supported"),
            Err(_) => return SurfaceHandle::Unavailable("2d context request threw"),
        };
        match ctx.dyn_into::<web::CanvasRenderingContext2d>() {
            Ok(ctx) => SurfaceHandle::Ready(CanvasTarget {
                canvas: canvas.clone(),
                ctx,
            }),
            Err(_) => SurfaceHandle::Unavailable("context is not a CanvasRenderingContext2d"),
        }
    }
}

impl CanvasTarget {
    /// Copy the surface's pixels onto the canvas. A surface whose size no
    /// longer matches the backing store is skipped.
    pub fn present(&self, surface: &Surface) {
        if surface.width() != self.canvas.width() || surface.height() != self.canvas.height() {
            return;
        }
        let image = match web::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.as_bytes()),
            surface.width(),
            surface.height(),
        ) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("[canvas] ImageData failed: {:?}", e);
                return;
            }
        };
        if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
            log::warn!("[canvas] putImageData failed: {:?}", e);
        }
    }
}

/// Draw `image` onto an offscreen canvas of `w x h` pixels and read the
/// result back as a surface.
pub fn rasterize_image(image: &web::HtmlImageElement, w: u32, h: u32) -> anyhow::Result<Surface> {
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let offscreen = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    offscreen.set_width(w);
    offscreen.set_height(h);
    let SurfaceHandle::Ready(target) = SurfaceHandle::acquire(&offscreen) else {
        anyhow::bail!("offscreen 2d context unavailable");
    };
    target
        .ctx
        .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w as f64, h as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let data = target
        .ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(Surface::from_rgba8(w, h, &data.data())?)
}
