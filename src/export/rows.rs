//! Row layouts for exported sheets

use chrono_tz::Tz;

use crate::analytics::{ArrivalBucket, BreakdownEntry, MealDay, OccupancyNight, TrendBucket};
use crate::models::Registration;

use super::{Cell, ReportRow};

fn yes_no(value: bool) -> Cell {
    Cell::text(if value { "Yes" } else { "No" })
}

fn day(value: Option<chrono::NaiveDate>) -> Cell {
    Cell::opt_text(value.map(|d| d.format("%Y-%m-%d")))
}

/// Full registration listing, timestamps shown in the event timezone
pub struct AttendeeRow<'a>(pub &'a Registration, pub Tz);

impl ReportRow for AttendeeRow<'_> {
    const HEADERS: &'static [&'static str] = &[
        "Registered At",
        "Full Name",
        "Email",
        "Phone",
        "Mode",
        "Location",
        "Accommodation",
        "Arrival",
        "Departure",
        "Nationality",
        "Member",
        "Branch",
        "Unit",
        "Badge Number",
    ];

    fn cells(&self) -> Vec<Cell> {
        let r = self.0;
        let registered_at = r.created_at.with_timezone(&self.1);
        vec![
            Cell::text(registered_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::text(r.full_name.as_str()),
            Cell::text(r.email.as_str()),
            Cell::opt_text(r.phone.as_deref()),
            Cell::text(r.participation_mode.to_string()),
            Cell::opt_text(r.onsite_location()),
            Cell::opt_text(r.onsite_accommodation()),
            day(r.arrival_date),
            day(r.departure_date),
            Cell::opt_text(r.nationality.as_deref()),
            yes_no(r.is_member),
            Cell::opt_text(r.member_branch()),
            Cell::opt_text(r.unit()),
            Cell::opt_text(r.badge_number.as_deref()),
        ]
    }
}

/// Onsite attendees who asked for accommodation
pub struct AccommodationRow<'a>(pub &'a Registration);

impl ReportRow for AccommodationRow<'_> {
    const HEADERS: &'static [&'static str] = &[
        "Full Name",
        "Phone",
        "Accommodation",
        "Location",
        "Arrival",
        "Departure",
        "Nights",
    ];

    fn cells(&self) -> Vec<Cell> {
        let r = self.0;
        let nights = match r.stay_window() {
            Some((arrival, departure)) => Cell::from((departure - arrival).num_days().max(0)),
            None => Cell::Empty,
        };
        vec![
            Cell::text(r.full_name.as_str()),
            Cell::opt_text(r.phone.as_deref()),
            Cell::opt_text(r.onsite_accommodation()),
            Cell::opt_text(r.onsite_location()),
            day(r.arrival_date),
            day(r.departure_date),
            nights,
        ]
    }
}

/// Attendees entitled to meals
pub struct MealEligibleRow<'a>(pub &'a Registration);

impl ReportRow for MealEligibleRow<'_> {
    const HEADERS: &'static [&'static str] =
        &["Full Name", "Email", "Arrival", "Departure", "Days Present"];

    fn cells(&self) -> Vec<Cell> {
        let r = self.0;
        let days = match r.stay_window() {
            Some((arrival, departure)) => Cell::from(((departure - arrival).num_days() + 1).max(0)),
            None => Cell::Empty,
        };
        vec![
            Cell::text(r.full_name.as_str()),
            Cell::text(r.email.as_str()),
            day(r.arrival_date),
            day(r.departure_date),
            days,
        ]
    }
}

pub struct ContactRow<'a>(pub &'a Registration);

impl ReportRow for ContactRow<'_> {
    const HEADERS: &'static [&'static str] = &["Full Name", "Email", "Phone", "Mode"];

    fn cells(&self) -> Vec<Cell> {
        let r = self.0;
        vec![
            Cell::text(r.full_name.as_str()),
            Cell::text(r.email.as_str()),
            Cell::opt_text(r.phone.as_deref()),
            Cell::text(r.participation_mode.to_string()),
        ]
    }
}

impl ReportRow for ArrivalBucket {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Arrivals",
        "General Accommodation",
        "Hotel Accommodation",
        "Needs Meals",
        "Within Zaria",
        "Outside Zaria",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.date.as_str()),
            self.count.into(),
            self.general_accommodation.into(),
            self.hotel_accommodation.into(),
            self.needs_meals.into(),
            self.within_zaria.into(),
            self.outside_zaria.into(),
        ]
    }
}

impl ReportRow for TrendBucket {
    const HEADERS: &'static [&'static str] = &["Date", "Online", "Onsite", "Total"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.date.as_str()),
            self.online_count.into(),
            self.onsite_count.into(),
            self.total.into(),
        ]
    }
}

impl ReportRow for MealDay {
    const HEADERS: &'static [&'static str] =
        &["Date", "Attendees", "Breakfast", "Lunch", "Dinner"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.date.as_str()),
            self.attendees.into(),
            self.breakfast.into(),
            self.lunch.into(),
            self.dinner.into(),
        ]
    }
}

impl ReportRow for OccupancyNight {
    const HEADERS: &'static [&'static str] = &["Night", "General", "Hotel", "Total"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.date.as_str()),
            self.general.into(),
            self.hotel.into(),
            self.total.into(),
        ]
    }
}

impl ReportRow for BreakdownEntry {
    const HEADERS: &'static [&'static str] = &["Label", "Count", "Percentage"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.label.as_str()),
            self.count.into(),
            self.percentage.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::fixtures::{onsite, registration};
    use crate::models::{AccommodationType, LocationType};

    const LAGOS: Tz = Tz::Africa__Lagos;

    #[test]
    fn test_rows_match_header_count() {
        let r = onsite(
            "2025-01-01T10:00:00Z",
            LocationType::OutsideZaria,
            Some(AccommodationType::Hotel),
            Some(("2025-08-14", "2025-08-16")),
        );
        assert_eq!(AttendeeRow(&r, LAGOS).cells().len(), AttendeeRow::HEADERS.len());
        assert_eq!(AccommodationRow(&r).cells().len(), AccommodationRow::HEADERS.len());
        assert_eq!(MealEligibleRow(&r).cells().len(), MealEligibleRow::HEADERS.len());
        assert_eq!(ContactRow(&r).cells().len(), ContactRow::HEADERS.len());
    }

    #[test]
    fn test_stay_lengths() {
        let r = onsite(
            "2025-01-01T10:00:00Z",
            LocationType::OutsideZaria,
            Some(AccommodationType::General),
            Some(("2025-08-14", "2025-08-16")),
        );
        assert_eq!(AccommodationRow(&r).cells()[6], Cell::Number(2.0));
        assert_eq!(MealEligibleRow(&r).cells()[4], Cell::Number(3.0));
    }

    #[test]
    fn test_online_attendee_has_blank_onsite_columns() {
        let mut r = registration("2025-01-01T10:00:00Z");
        r.location_type = Some(LocationType::WithinZaria);
        let cells = AttendeeRow(&r, LAGOS).cells();
        assert_eq!(cells[4], Cell::text("Online"));
        assert_eq!(cells[5], Cell::Empty);
    }

    #[test]
    fn test_registered_at_uses_event_timezone() {
        // Late evening UTC is already the next day in Lagos
        let r = registration("2025-01-03T23:45:00Z");
        assert_eq!(AttendeeRow(&r, LAGOS).cells()[0], Cell::text("2025-01-04 00:45"));
        assert_eq!(AttendeeRow(&r, Tz::UTC).cells()[0], Cell::text("2025-01-03 23:45"));
    }
}
