//! Accommodation requests and nightly occupancy

use serde::Serialize;
use utoipa::ToSchema;

use super::{dates, round1, AnalyticsContext};
use crate::models::{AccommodationType, Registration};

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct OccupancyNight {
    pub date: String,
    pub general: i64,
    pub hotel: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccommodationOccupancy {
    pub general_requests: i64,
    pub hotel_requests: i64,
    pub total_requests: i64,
    pub nights: Vec<OccupancyNight>,
    pub peak_night: OccupancyNight,
    pub average_stay_nights: f64,
}

/// Nightly occupancy over the event range.
///
/// A record occupies the nights of `[arrival, departure)`: the departure day
/// is checkout and is not a night. This deliberately differs from the meal
/// window, which includes the departure day.
pub fn accommodation_occupancy(
    records: &[Registration],
    ctx: &AnalyticsContext,
) -> AccommodationOccupancy {
    let onsite: Vec<&Registration> = records.iter().filter(|r| r.is_onsite()).collect();

    let general_requests = onsite
        .iter()
        .filter(|r| r.onsite_accommodation() == Some(AccommodationType::General))
        .count() as i64;
    let hotel_requests = onsite
        .iter()
        .filter(|r| r.onsite_accommodation() == Some(AccommodationType::Hotel))
        .count() as i64;

    let stays: Vec<_> = onsite
        .iter()
        .filter_map(|r| r.stay_window().map(|w| (w, r.onsite_accommodation())))
        .collect();

    let nights: Vec<OccupancyNight> = dates::each_day(ctx.start_date, ctx.end_date)
        .map(|night| {
            let mut bucket = OccupancyNight {
                date: dates::date_key(night),
                ..Default::default()
            };
            for ((arrival, departure), kind) in &stays {
                if *arrival <= night && night < *departure {
                    bucket.total += 1;
                    match kind {
                        Some(AccommodationType::General) => bucket.general += 1,
                        Some(AccommodationType::Hotel) => bucket.hotel += 1,
                        None => {}
                    }
                }
            }
            bucket
        })
        .collect();

    let mut peak_night = OccupancyNight::default();
    for night in &nights {
        if night.total > peak_night.total {
            peak_night = night.clone();
        }
    }

    let average_stay_nights = if stays.is_empty() {
        0.0
    } else {
        // Departure before arrival is bad data; count it as a zero-night stay
        let total_nights: i64 = stays
            .iter()
            .map(|((arrival, departure), _)| (*departure - *arrival).num_days().max(0))
            .sum();
        round1(total_nights as f64 / stays.len() as f64)
    };

    AccommodationOccupancy {
        general_requests,
        hotel_requests,
        total_requests: general_requests + hotel_requests,
        nights,
        peak_night,
        average_stay_nights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::meals::meal_requirements;
    use crate::analytics::tests::context_for_range;
    use crate::models::registration::fixtures::{date, onsite, registration};
    use crate::models::LocationType;

    #[test]
    fn test_departure_night_is_excluded() {
        let records = vec![onsite(
            "2025-01-01T10:00:00Z",
            LocationType::OutsideZaria,
            Some(AccommodationType::Hotel),
            Some(("2025-01-10", "2025-01-12")),
        )];
        let ctx = context_for_range("2025-01-09", "2025-01-13");
        let occupancy = accommodation_occupancy(&records, &ctx);

        let occupied: Vec<&str> = occupancy
            .nights
            .iter()
            .filter(|n| n.total > 0)
            .map(|n| n.date.as_str())
            .collect();
        assert_eq!(occupied, ["2025-01-10", "2025-01-11"]);
        assert_eq!(occupancy.nights[1].hotel, 1);
        assert_eq!(occupancy.peak_night.date, "2025-01-10");
        assert_eq!(occupancy.average_stay_nights, 2.0);

        let meals = meal_requirements(&records, &ctx);
        assert_eq!(meals.total_breakfast, 3);
    }

    #[test]
    fn test_same_day_stay_has_no_night_but_eats() {
        let records = vec![onsite(
            "2025-01-01T10:00:00Z",
            LocationType::OutsideZaria,
            Some(AccommodationType::General),
            Some(("2025-01-10", "2025-01-10")),
        )];
        let ctx = context_for_range("2025-01-09", "2025-01-11");

        let occupancy = accommodation_occupancy(&records, &ctx);
        assert!(occupancy.nights.iter().all(|n| n.total == 0));
        assert_eq!(occupancy.average_stay_nights, 0.0);

        let meals = meal_requirements(&records, &ctx);
        assert_eq!(meals.total_breakfast, 1);
    }

    #[test]
    fn test_requests_ignore_online_records() {
        let mut online = registration("2025-01-01T10:00:00Z");
        online.accommodation_type = Some(AccommodationType::Hotel);
        online.arrival_date = Some(date("2025-01-10"));
        online.departure_date = Some(date("2025-01-12"));
        let records = vec![
            online,
            onsite(
                "2025-01-01T10:00:00Z",
                LocationType::WithinZaria,
                Some(AccommodationType::General),
                None,
            ),
        ];
        let ctx = context_for_range("2025-01-10", "2025-01-12");
        let occupancy = accommodation_occupancy(&records, &ctx);

        assert_eq!(occupancy.general_requests, 1);
        assert_eq!(occupancy.hotel_requests, 0);
        assert!(occupancy.nights.iter().all(|n| n.total == 0));
    }

    #[test]
    fn test_average_stay() {
        let records = vec![
            onsite(
                "2025-01-01T10:00:00Z",
                LocationType::OutsideZaria,
                Some(AccommodationType::General),
                Some(("2025-01-10", "2025-01-11")),
            ),
            onsite(
                "2025-01-01T10:00:00Z",
                LocationType::OutsideZaria,
                Some(AccommodationType::General),
                Some(("2025-01-10", "2025-01-14")),
            ),
        ];
        let ctx = context_for_range("2025-01-10", "2025-01-14");
        let occupancy = accommodation_occupancy(&records, &ctx);
        assert_eq!(occupancy.average_stay_nights, 2.5);
        assert_eq!(occupancy.peak_night.total, 2);
    }
}
