//! Attendee badge rendering
//!
//! A badge is an SVG filled from a fixed template, then rasterized to PNG.
//! Numbering is handed out by [`BadgeNumberAllocator`], one writer at a time.

pub mod numbering;
pub mod raster;
pub mod render;

use thiserror::Error;

use crate::error::AppError;

pub use numbering::BadgeNumberAllocator;
pub use raster::rasterize;
pub use render::{render_svg, Photo};

/// Failures of the render pipeline
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("invalid SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {0}x{1} canvas")]
    Canvas(u32, u32),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl From<BadgeError> for AppError {
    fn from(err: BadgeError) -> Self {
        AppError::Render(err.to_string())
    }
}

/// Render a badge straight to PNG bytes
pub fn render_png(
    registration: &crate::models::Registration,
    number: &crate::models::BadgeNumber,
    event_name: &str,
    photo: Option<&Photo>,
) -> Result<Vec<u8>, BadgeError> {
    let svg = render_svg(registration, number, event_name, photo)?;
    rasterize(&svg)
}
