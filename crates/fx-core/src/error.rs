use thiserror::Error;

/// Errors raised while constructing surfaces, masks and fields.
///
/// Per-frame drawing never fails; everything fallible happens at setup time
/// so a host can degrade to "effect absent" before the first frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("surface dimensions {width}x{height} are invalid")]
    InvalidSurface { width: u32, height: u32 },

    #[error("surface {width}x{height} exceeds the maximum pixel count")]
    SurfaceTooLarge { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("mask {mask_width}x{mask_height} does not match surface {width}x{height}")]
    MaskMismatch {
        mask_width: u32,
        mask_height: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
