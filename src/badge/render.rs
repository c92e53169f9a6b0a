//! Badge template filling

use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{Color, QrCode};

use crate::models::{BadgeNumber, QrPayload, Registration};

use super::BadgeError;

pub const BADGE_WIDTH: u32 = 600;
pub const BADGE_HEIGHT: u32 = 900;

const QR_EXTENT: f64 = 200.0;
const QR_TOP: f64 = 630.0;
/// Light modules around the symbol, as the QR standard requires
const QR_QUIET_ZONE: usize = 4;

/// Attendee photo, already fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Accept PNG and JPEG data, recognised by signature
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let content_type = if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            "image/png"
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "image/jpeg"
        } else {
            return None;
        };
        Some(Self {
            content_type,
            bytes,
        })
    }

    fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

struct QrModule {
    x: f64,
    y: f64,
}

struct QrLayout {
    offset_x: f64,
    offset_y: f64,
    extent: f64,
    module_size: f64,
    modules: Vec<QrModule>,
}

impl QrLayout {
    fn encode(data: &str) -> Result<Self, BadgeError> {
        let code = QrCode::new(data.as_bytes())?;
        let width = code.width();
        let module_size = QR_EXTENT / (width + 2 * QR_QUIET_ZONE) as f64;
        let modules = code
            .to_colors()
            .into_iter()
            .enumerate()
            .filter(|(_, color)| *color == Color::Dark)
            .map(|(index, _)| QrModule {
                x: (index % width + QR_QUIET_ZONE) as f64 * module_size,
                y: (index / width + QR_QUIET_ZONE) as f64 * module_size,
            })
            .collect();

        Ok(Self {
            offset_x: (f64::from(BADGE_WIDTH) - QR_EXTENT) / 2.0,
            offset_y: QR_TOP,
            extent: QR_EXTENT,
            module_size,
            modules,
        })
    }
}

#[derive(Template)]
#[template(path = "badge.svg", escape = "html")]
struct BadgeSvg<'a> {
    width: u32,
    height: u32,
    center: u32,
    event_title: &'a str,
    mode_label: String,
    photo: Option<String>,
    initials: String,
    full_name: &'a str,
    location_label: Option<String>,
    meals_included: bool,
    qr: QrLayout,
    badge_number: String,
}

/// Up to two uppercase initials, `?` for an empty name
pub fn initials(full_name: &str) -> String {
    let letters: String = full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

/// Fill the badge template for one attendee
pub fn render_svg(
    registration: &Registration,
    number: &BadgeNumber,
    event_name: &str,
    photo: Option<&Photo>,
) -> Result<String, BadgeError> {
    let payload = QrPayload::new(registration, number);
    let payload_json = serde_json::to_string(&payload)
        .map_err(|e| BadgeError::Encode(e.to_string()))?;

    let template = BadgeSvg {
        width: BADGE_WIDTH,
        height: BADGE_HEIGHT,
        center: BADGE_WIDTH / 2,
        event_title: event_name,
        mode_label: registration.participation_mode.to_string(),
        photo: photo.map(Photo::data_uri),
        initials: initials(&registration.full_name),
        full_name: registration.full_name.trim(),
        location_label: registration.onsite_location().map(|l| l.to_string()),
        meals_included: payload.meals_included,
        qr: QrLayout::encode(&payload_json)?,
        badge_number: number.to_string(),
    };

    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::fixtures::onsite;
    use crate::models::LocationType;

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0xF8, 0xCF, 0xC0, 0xF0, 0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99,
        0x3D, 0x1D, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn attendee() -> Registration {
        let mut r = onsite("2025-01-01T10:00:00Z", LocationType::OutsideZaria, None, None);
        r.full_name = "Amina Bello & Co".to_string();
        r
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("amina bello yusuf"), "AB");
        assert_eq!(initials("  Musa "), "M");
        assert_eq!(initials(""), "?");
    }

    #[test]
    fn test_svg_contains_attendee_fields_escaped() {
        let svg =
            render_svg(&attendee(), &BadgeNumber::new("GD2025", 1), "GD 2025", None).unwrap();
        assert!(svg.contains("GD2025-0001"));
        // askama writes `&` as a numeric reference
        assert!(svg.contains("Amina Bello &#38; Co"));
        assert!(!svg.contains("Bello & Co"));
        assert!(svg.contains("Meals Included"));
        assert!(svg.contains("Outside Zaria"));
        // Initials stand in for the missing photo
        assert!(svg.contains(">AB<"));
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn test_svg_embeds_photo() {
        let photo = Photo::from_bytes(PNG_1X1.to_vec()).unwrap();
        let svg = render_svg(&attendee(), &BadgeNumber::new("GD2025", 1), "GD 2025", Some(&photo))
            .unwrap();
        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_photo_signature() {
        assert_eq!(Photo::from_bytes(PNG_1X1.to_vec()).unwrap().content_type, "image/png");
        assert_eq!(
            Photo::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap().content_type,
            "image/jpeg"
        );
        assert!(Photo::from_bytes(b"<html>".to_vec()).is_none());
    }
}
