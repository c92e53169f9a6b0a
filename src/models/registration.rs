//! Attendee registration model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::{AccommodationType, LocationType, ParticipationMode};

/// Attendee registration as consumed by the calculators, exports and badges.
///
/// Location, accommodation and stay dates only carry meaning for onsite
/// attendees; accessors below return `None` for online records even when the
/// stored row has stale values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub participation_mode: ParticipationMode,
    pub location_type: Option<LocationType>,
    pub accommodation_type: Option<AccommodationType>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub is_member: bool,
    pub branch: Option<String>,
    pub church_unit: Option<String>,
    pub badge_number: Option<String>,
    pub badge_url: Option<String>,
    pub badge_generated_at: Option<DateTime<Utc>>,
    pub badge_regenerated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn is_onsite(&self) -> bool {
        self.participation_mode == ParticipationMode::Onsite
    }

    /// Location, only for onsite attendees
    pub fn onsite_location(&self) -> Option<LocationType> {
        if self.is_onsite() {
            self.location_type
        } else {
            None
        }
    }

    /// Accommodation, only for onsite attendees
    pub fn onsite_accommodation(&self) -> Option<AccommodationType> {
        if self.is_onsite() {
            self.accommodation_type
        } else {
            None
        }
    }

    /// Arrival and departure when both are set on an onsite record
    pub fn stay_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        if !self.is_onsite() {
            return None;
        }
        match (self.arrival_date, self.departure_date) {
            (Some(arrival), Some(departure)) => Some((arrival, departure)),
            _ => None,
        }
    }

    /// Onsite attendees travelling from outside Zaria are catered for
    pub fn meals_included(&self) -> bool {
        self.onsite_location() == Some(LocationType::OutsideZaria)
    }

    /// Branch of a member, ignoring blank values
    pub fn member_branch(&self) -> Option<&str> {
        if !self.is_member {
            return None;
        }
        non_blank(self.branch.as_deref())
    }

    pub fn unit(&self) -> Option<&str> {
        non_blank(self.church_unit.as_deref())
    }

    pub fn nationality_or<'a>(&'a self, home_country: &'a str) -> &'a str {
        non_blank(self.nationality.as_deref()).unwrap_or(home_country)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Raw database row; enum columns are stored as text codes
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub participation_mode: String,
    pub location_type: Option<String>,
    pub accommodation_type: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub is_member: bool,
    pub branch: Option<String>,
    pub church_unit: Option<String>,
    pub badge_number: Option<String>,
    pub badge_url: Option<String>,
    pub badge_generated_at: Option<DateTime<Utc>>,
    pub badge_regenerated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            photo_url: row.photo_url,
            // Column is CHECK-constrained; anything else is treated as remote
            participation_mode: ParticipationMode::from_code(&row.participation_mode)
                .unwrap_or(ParticipationMode::Online),
            location_type: row.location_type.as_deref().and_then(LocationType::from_code),
            accommodation_type: row
                .accommodation_type
                .as_deref()
                .and_then(AccommodationType::from_code),
            arrival_date: row.arrival_date,
            departure_date: row.departure_date,
            nationality: row.nationality,
            is_member: row.is_member,
            branch: row.branch,
            church_unit: row.church_unit,
            badge_number: row.badge_number,
            badge_url: row.badge_url,
            badge_generated_at: row.badge_generated_at,
            badge_regenerated_at: row.badge_regenerated_at,
            created_at: row.created_at,
        }
    }
}

/// Typed filter applied to registrations before aggregation or export
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationFilter {
    /// Only this participation mode
    pub participation_mode: Option<ParticipationMode>,
    /// Only this location (onsite attendees)
    pub location_type: Option<LocationType>,
    /// Only this accommodation (onsite attendees)
    pub accommodation_type: Option<AccommodationType>,
    /// Only members (true) or non-members (false)
    pub is_member: Option<bool>,
    /// Registered on or after this day (YYYY-MM-DD)
    pub created_from: Option<NaiveDate>,
    /// Registered on or before this day (YYYY-MM-DD)
    pub created_to: Option<NaiveDate>,
}

impl RegistrationFilter {
    pub fn is_empty(&self) -> bool {
        self.participation_mode.is_none()
            && self.location_type.is_none()
            && self.accommodation_type.is_none()
            && self.is_member.is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }

    /// Whether a registration passes every set criterion.
    /// `created_day` is the registration's local calendar day.
    pub fn matches(&self, registration: &Registration, created_day: NaiveDate) -> bool {
        if let Some(mode) = self.participation_mode {
            if registration.participation_mode != mode {
                return false;
            }
        }
        if let Some(location) = self.location_type {
            if registration.onsite_location() != Some(location) {
                return false;
            }
        }
        if let Some(accommodation) = self.accommodation_type {
            if registration.onsite_accommodation() != Some(accommodation) {
                return false;
            }
        }
        if let Some(member) = self.is_member {
            if registration.is_member != member {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if created_day < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if created_day > to {
                return false;
            }
        }
        true
    }
}

/// Query parameters for listing registrations
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RegistrationQuery {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}
