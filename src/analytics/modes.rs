//! Participation mode and location breakdown

use serde::Serialize;
use utoipa::ToSchema;

use super::percentage;
use crate::models::{LocationType, Registration};

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ModeBreakdown {
    pub total: i64,
    pub online: i64,
    pub onsite: i64,
    /// Over all records
    pub online_percentage: f64,
    pub onsite_percentage: f64,
    pub within_zaria: i64,
    pub outside_zaria: i64,
    /// Over onsite records only
    pub within_zaria_percentage: f64,
    pub outside_zaria_percentage: f64,
}

pub fn mode_breakdown(records: &[Registration]) -> ModeBreakdown {
    let total = records.len() as i64;
    let onsite = records.iter().filter(|r| r.is_onsite()).count() as i64;
    let online = total - onsite;

    let within_zaria = records
        .iter()
        .filter(|r| r.onsite_location() == Some(LocationType::WithinZaria))
        .count() as i64;
    let outside_zaria = records
        .iter()
        .filter(|r| r.onsite_location() == Some(LocationType::OutsideZaria))
        .count() as i64;

    ModeBreakdown {
        total,
        online,
        onsite,
        online_percentage: percentage(online, total),
        onsite_percentage: percentage(onsite, total),
        within_zaria,
        outside_zaria,
        within_zaria_percentage: percentage(within_zaria, onsite),
        outside_zaria_percentage: percentage(outside_zaria, onsite),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::fixtures::{onsite, registration};

    #[test]
    fn test_location_percentages_use_onsite_denominator() {
        let records = vec![
            registration("2025-01-01T10:00:00Z"),
            registration("2025-01-01T10:00:00Z"),
            onsite("2025-01-01T10:00:00Z", LocationType::WithinZaria, None, None),
            onsite("2025-01-01T10:00:00Z", LocationType::OutsideZaria, None, None),
        ];
        let modes = mode_breakdown(&records);

        assert_eq!(modes.online, 2);
        assert_eq!(modes.onsite, 2);
        assert_eq!(modes.online_percentage, 50.0);
        assert_eq!(modes.within_zaria_percentage, 50.0);
        assert_eq!(modes.outside_zaria_percentage, 50.0);
    }

    #[test]
    fn test_no_onsite_records_yields_zero_location_share() {
        let mut stale = registration("2025-01-01T10:00:00Z");
        stale.location_type = Some(LocationType::OutsideZaria);
        let modes = mode_breakdown(&[stale]);

        assert_eq!(modes.online_percentage, 100.0);
        assert_eq!(modes.outside_zaria, 0);
        assert_eq!(modes.outside_zaria_percentage, 0.0);
    }

    #[test]
    fn test_empty_modes() {
        assert_eq!(mode_breakdown(&[]), ModeBreakdown::default());
    }
}
