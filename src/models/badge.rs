//! Badge model: numbering, lifecycle state and QR payload

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{enums::ParticipationMode, registration::Registration};

static BADGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>[A-Za-z0-9]+)-(?P<seq>\d{4,})$").expect("valid badge number pattern")
});

/// Badge number of the form `<prefix>-NNNN`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeNumber {
    pub prefix: String,
    pub sequence: u32,
}

impl BadgeNumber {
    pub fn new(prefix: &str, sequence: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            sequence,
        }
    }

    /// Prefixes are ASCII letters and digits, so `parse` can split on the dash
    pub fn is_valid_prefix(prefix: &str) -> bool {
        !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric())
    }

    pub fn parse(value: &str) -> Option<Self> {
        let caps = BADGE_NUMBER_RE.captures(value.trim())?;
        let sequence = caps["seq"].parse().ok()?;
        Some(Self {
            prefix: caps["prefix"].to_string(),
            sequence,
        })
    }

    /// Storage key of the badge image
    pub fn storage_key(&self) -> String {
        format!("badges/{}.png", self)
    }
}

impl std::fmt::Display for BadgeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:04}", self.prefix, self.sequence)
    }
}

/// Badge lifecycle, derived from the registration's badge columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeState {
    NotGenerated,
    Generated,
    Regenerated,
}

impl BadgeState {
    pub fn of(registration: &Registration) -> Self {
        match (&registration.badge_number, registration.badge_regenerated_at) {
            (None, _) => BadgeState::NotGenerated,
            (Some(_), None) => BadgeState::Generated,
            (Some(_), Some(_)) => BadgeState::Regenerated,
        }
    }
}

/// JSON encoded into the badge QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub badge_number: String,
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub participation_mode: ParticipationMode,
    pub meals_included: bool,
}

impl QrPayload {
    pub fn new(registration: &Registration, number: &BadgeNumber) -> Self {
        Self {
            badge_number: number.to_string(),
            id: registration.id,
            name: registration.full_name.clone(),
            email: registration.email.clone(),
            participation_mode: registration.participation_mode,
            meals_included: registration.meals_included(),
        }
    }
}

/// Result of a generate or regenerate request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BadgeResponse {
    pub registration_id: Uuid,
    pub badge_number: String,
    /// Stored URL of the badge image
    pub badge_url: String,
    /// Same URL with a version query so clients skip stale cached images
    pub cache_busted_url: String,
    pub state: BadgeState,
    pub issued_at: DateTime<Utc>,
}
