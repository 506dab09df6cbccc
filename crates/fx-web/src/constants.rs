// DOM wiring constants for the browser front-end

// Device pixel ratio cap for backing stores
pub const DPR_CAP: f64 = 2.0;

// Boot splash fade (CSS transition on the splash element)
pub const SPLASH_FADE_STYLE: &str = "opacity:0;transition:opacity 0.8s ease-in-out";
pub const SPLASH_HIDDEN_STYLE: &str = "display:none";

// Attributes written by the DOM bindings
pub const ATTR_EXPANDED: &str = "data-expanded";
pub const ATTR_PANEL: &str = "data-panel";
pub const ATTR_INDEX: &str = "data-index";
pub const ATTR_DIRECTION: &str = "data-direction";
pub const ATTR_LINE_STYLE: &str = "data-style";
pub const ATTR_SLIDE: &str = "data-slide";
pub const ATTR_PROGRESS: &str = "data-progress";

// Boot splash line and progress bar refresh
pub const BOOT_TICK_MS: i32 = 50;

// Carousel tick granularity; the core timer still counts real elapsed ms
pub const CAROUSEL_TICK_MS: i32 = 250;
