//! Registration analytics
//!
//! Pure, synchronous calculators over an in-memory slice of registrations.
//! None of them mutate their input or keep state between calls, and all of
//! them return a fully populated result for empty input.

pub mod accommodation;
pub mod arrivals;
pub mod breakdown;
pub mod dates;
pub mod meals;
pub mod modes;
pub mod trend;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::EventConfig,
    models::{Registration, RegistrationFilter},
};

pub use accommodation::{accommodation_occupancy, AccommodationOccupancy, OccupancyNight};
pub use arrivals::{daily_arrivals, ArrivalBucket, DailyArrivals};
pub use breakdown::{
    branch_distribution, nationality_breakdown, unit_distribution, Breakdown, BreakdownEntry,
};
pub use meals::{meal_requirements, MealDay, MealRequirements};
pub use modes::{mode_breakdown, ModeBreakdown};
pub use trend::{registration_trend, RegistrationTrend, TrendBucket};

/// Event facts and the current day the calculators need
#[derive(Debug, Clone)]
pub struct AnalyticsContext {
    pub timezone: Tz,
    pub event_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub home_country: String,
    pub today: NaiveDate,
}

impl AnalyticsContext {
    pub fn new(event: &EventConfig, today: NaiveDate) -> Self {
        Self {
            timezone: event.timezone,
            event_date: event.event_date,
            start_date: event.start_date,
            end_date: event.end_date,
            home_country: event.home_country.clone(),
            today,
        }
    }
}

/// Every dashboard aggregate computed from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardAnalytics {
    pub trend: RegistrationTrend,
    pub arrivals: DailyArrivals,
    pub meals: MealRequirements,
    pub accommodation: AccommodationOccupancy,
    pub nationality: Breakdown,
    pub branches: Breakdown,
    pub units: Breakdown,
    pub modes: ModeBreakdown,
}

pub fn dashboard(records: &[Registration], ctx: &AnalyticsContext) -> DashboardAnalytics {
    DashboardAnalytics {
        trend: registration_trend(records, ctx),
        arrivals: daily_arrivals(records),
        meals: meal_requirements(records, ctx),
        accommodation: accommodation_occupancy(records, ctx),
        nationality: nationality_breakdown(records, &ctx.home_country),
        branches: branch_distribution(records),
        units: unit_distribution(records),
        modes: mode_breakdown(records),
    }
}

/// Registrations passing `filter`, with creation days bucketed like the trend
pub fn apply_filter(
    records: &[Registration],
    filter: &RegistrationFilter,
    timezone: Tz,
) -> Vec<Registration> {
    records
        .iter()
        .filter(|r| filter.matches(r, dates::local_day(&r.created_at, timezone)))
        .cloned()
        .collect()
}

/// Share of `count` in `total`, one decimal place; zero when `total` is zero
pub fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 * 100.0 / total as f64)
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
