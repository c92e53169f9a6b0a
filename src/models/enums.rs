//! Shared registration enums (stored as snake_case text codes)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ParticipationMode
// ---------------------------------------------------------------------------

/// How an attendee takes part in the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationMode {
    Online,
    Onsite,
}

impl ParticipationMode {
    pub fn as_code(&self) -> &'static str {
        match self {
            ParticipationMode::Online => "online",
            ParticipationMode::Onsite => "onsite",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "online" => Some(ParticipationMode::Online),
            "onsite" => Some(ParticipationMode::Onsite),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParticipationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ParticipationMode::Online => "Online",
            ParticipationMode::Onsite => "Onsite",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// LocationType
// ---------------------------------------------------------------------------

/// Where an onsite attendee travels from, relative to the host city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    WithinZaria,
    OutsideZaria,
}

impl LocationType {
    pub fn as_code(&self) -> &'static str {
        match self {
            LocationType::WithinZaria => "within_zaria",
            LocationType::OutsideZaria => "outside_zaria",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "within_zaria" => Some(LocationType::WithinZaria),
            "outside_zaria" => Some(LocationType::OutsideZaria),
            _ => None,
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LocationType::WithinZaria => "Within Zaria",
            LocationType::OutsideZaria => "Outside Zaria",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// AccommodationType
// ---------------------------------------------------------------------------

/// Accommodation requested by an onsite attendee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    General,
    Hotel,
}

impl AccommodationType {
    pub fn as_code(&self) -> &'static str {
        match self {
            AccommodationType::General => "general",
            AccommodationType::Hotel => "hotel",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "general" => Some(AccommodationType::General),
            "hotel" => Some(AccommodationType::Hotel),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AccommodationType::General => "General",
            AccommodationType::Hotel => "Hotel",
        };
        write!(f, "{}", label)
    }
}
