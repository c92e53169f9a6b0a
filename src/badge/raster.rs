//! SVG to PNG rasterization

use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};

use super::BadgeError;

/// System fonts, scanned once per process
static FONTS: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "Loaded system fonts for badge rendering");
    Arc::new(db)
});

/// Rasterize an SVG document at its intrinsic size
pub fn rasterize(svg: &str) -> Result<Vec<u8>, BadgeError> {
    let options = usvg::Options {
        fontdb: FONTS.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| BadgeError::Canvas(size.width(), size.height()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| BadgeError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::render::{render_svg, BADGE_HEIGHT, BADGE_WIDTH};
    use crate::models::registration::fixtures::onsite;
    use crate::models::{BadgeNumber, LocationType};

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_dimensions(png: &[u8]) -> (u32, u32) {
        // IHDR is always the first chunk
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[test]
    fn test_rasterize_simple_svg() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#ff0000"/></svg>"##;
        let png = rasterize(svg).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
        assert_eq!(png_dimensions(&png), (40, 20));
    }

    #[test]
    fn test_rasterize_badge() {
        let r = onsite("2025-01-01T10:00:00Z", LocationType::WithinZaria, None, None);
        let svg = render_svg(&r, &BadgeNumber::new("GD2025", 3), "GD 2025", None).unwrap();
        let png = rasterize(&svg).unwrap();
        assert_eq!(png_dimensions(&png), (BADGE_WIDTH, BADGE_HEIGHT));
    }

    #[test]
    fn test_rasterize_rejects_invalid_svg() {
        assert!(matches!(rasterize("not svg"), Err(BadgeError::Svg(_))));
    }
}
