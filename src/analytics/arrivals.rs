//! Daily arrival forecast for onsite attendees

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::dates;
use crate::models::{AccommodationType, LocationType, Registration};

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ArrivalBucket {
    pub date: String,
    pub count: i64,
    pub general_accommodation: i64,
    pub hotel_accommodation: i64,
    /// Arrivals from outside Zaria, who are catered for
    pub needs_meals: i64,
    pub within_zaria: i64,
    pub outside_zaria: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyArrivals {
    pub arrivals_by_date: Vec<ArrivalBucket>,
    pub peak_arrival: ArrivalBucket,
    /// Every onsite registrant, with or without an arrival date
    pub total_arrivals: i64,
}

pub fn daily_arrivals(records: &[Registration]) -> DailyArrivals {
    let mut per_day: BTreeMap<NaiveDate, ArrivalBucket> = BTreeMap::new();
    let mut total_arrivals = 0;

    for record in records.iter().filter(|r| r.is_onsite()) {
        total_arrivals += 1;
        let Some(arrival) = record.arrival_date else {
            continue;
        };

        let bucket = per_day.entry(arrival).or_insert_with(|| ArrivalBucket {
            date: dates::date_key(arrival),
            ..Default::default()
        });
        bucket.count += 1;
        match record.onsite_accommodation() {
            Some(AccommodationType::General) => bucket.general_accommodation += 1,
            Some(AccommodationType::Hotel) => bucket.hotel_accommodation += 1,
            None => {}
        }
        match record.onsite_location() {
            Some(LocationType::WithinZaria) => bucket.within_zaria += 1,
            Some(LocationType::OutsideZaria) => {
                bucket.outside_zaria += 1;
                bucket.needs_meals += 1;
            }
            None => {}
        }
    }

    let arrivals_by_date: Vec<ArrivalBucket> = per_day.into_values().collect();

    let mut peak_arrival = ArrivalBucket::default();
    for bucket in &arrivals_by_date {
        if bucket.count > peak_arrival.count {
            peak_arrival = bucket.clone();
        }
    }

    DailyArrivals {
        arrivals_by_date,
        peak_arrival,
        total_arrivals,
    }
}
