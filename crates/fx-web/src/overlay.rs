use crate::constants::{ATTR_DIRECTION, ATTR_EXPANDED, ATTR_INDEX, SPLASH_FADE_STYLE, SPLASH_HIDDEN_STYLE};
use web_sys as web;

#[inline]
pub fn show(el: &web::Element) {
    let _ = el.set_attribute("style", "");
}

/// Start the exit fade. The element stays in the layout until [`hide`].
#[inline]
pub fn fade(el: &web::Element) {
    let _ = el.set_attribute("style", SPLASH_FADE_STYLE);
}

#[inline]
pub fn hide(el: &web::Element) {
    let _ = el.set_attribute("style", SPLASH_HIDDEN_STYLE);
}

#[inline]
pub fn set_expanded(el: &web::Element, expanded: bool) {
    let _ = el.set_attribute(ATTR_EXPANDED, if expanded { "true" } else { "false" });
}

#[inline]
pub fn set_slide(root: &web::Element, index: usize, direction: i8) {
    let _ = root.set_attribute(ATTR_INDEX, &index.to_string());
    let _ = root.set_attribute(ATTR_DIRECTION, &direction.to_string());
}
