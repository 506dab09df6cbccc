pub mod clock;
pub mod color;
pub mod constants;
pub mod error;
pub mod font;
pub mod mask;
pub mod particles;
pub mod pointer;
pub mod render;
pub mod reveal;
pub mod session;
pub mod surface;

pub use clock::{FrameClock, FrameLoop, FrameTime};
pub use color::{Color, Rgba8};
pub use constants::*;
pub use error::FxError;
pub use mask::{reveal_mask, AlphaMask, CircleMask};
pub use particles::{Bounds, FieldConfig, Layout, ParticleField, Token};
pub use pointer::{client_to_surface, PointerInput, PointerState, PointerTracker};
pub use render::{run_frame, CodeLens, CodeLensConfig, Effect, GlyphMatrix, GlyphMatrixConfig, MonitorConfig, SignalMonitor};
pub use reveal::{BootController, BootPhase, Carousel, Completion, PanelSet};
pub use session::{MemorySessionStore, SessionStore};
pub use surface::{Surface, TextAlign, TextBaseline};
