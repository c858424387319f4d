//! Styled QR code rendering.
//!
//! Turns a QR module grid into a transparent raster or vector image:
//! rounded modules, an optional backing card, a cleared cutout and a
//! centred logo on a translucent plate.

pub mod compose;
pub mod encode;
pub mod geometry;
pub mod grid;
pub mod pipeline;
pub mod style;

// Re-exports for convenience
pub use compose::{overlay, CardStyle, LogoOverlay, PlateStyle};
pub use encode::{encode_png, encode_svg};
pub use geometry::{render, render_raster, render_vector, OutputKind, PathPrimitive};
pub use geometry::{RasterImage, RenderedImage, VectorImage, ViewBox};
pub use grid::{EncodeOptions, FinderZone, ModuleGrid};
pub use pipeline::{Pipeline, Stage};
pub use qrcode::EcLevel;
pub use style::{parse_hex_color, Background, RenderStyle};

/// Largest payload, in bytes, that any QR symbol can carry (version 40, level L).
pub const MAX_DATA_BYTES: usize = 2953;

/// Logo width fraction above which scanners start to struggle, even at level H.
pub const RECOMMENDED_MAX_LOGO_FRACTION: f32 = 0.22;

/// Errors that can occur while encoding or rendering a symbol.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid module grid: {0}")]
    InvalidGrid(String),

    #[error("Data does not fit the requested symbol: {0}")]
    EncodingCapacity(String),

    #[error("Unsupported symbol version: {0}")]
    UnsupportedVersion(String),

    #[error("Failed to load logo: {0}")]
    LogoLoad(String),

    #[error("Logo compositing is not supported on vector output")]
    UnsupportedFormat,

    #[error("Invalid colour {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for qr-engine operations.
pub type Result<T> = std::result::Result<T, QrError>;
