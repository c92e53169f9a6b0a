//! Composite reports

use chrono_tz::Tz;

use crate::analytics::{self, AnalyticsContext, DashboardAnalytics};
use crate::models::Registration;

use super::{
    rows::{AccommodationRow, AttendeeRow, ContactRow, MealEligibleRow},
    Dataset, ReportWorkbook,
};

/// Sheet order of the master report
pub const MASTER_SHEETS: [&str; 5] = [
    "All Registrations",
    "Accommodation",
    "Meal Eligible",
    "Arrivals by Day",
    "Contacts",
];

/// One sheet listing the given registrations
pub fn registrations_report(name: &str, records: &[Registration], tz: Tz) -> ReportWorkbook {
    let rows: Vec<AttendeeRow> = records.iter().map(|r| AttendeeRow(r, tz)).collect();
    ReportWorkbook::new(name).with_dataset(Dataset::from_rows("Registrations", &rows))
}

/// Every registration plus the accommodation, catering, arrival and contact views
pub fn master_report(records: &[Registration], tz: Tz) -> ReportWorkbook {
    let all: Vec<AttendeeRow> = records.iter().map(|r| AttendeeRow(r, tz)).collect();
    let accommodation: Vec<AccommodationRow> = records
        .iter()
        .filter(|r| r.onsite_accommodation().is_some())
        .map(AccommodationRow)
        .collect();
    let meals: Vec<MealEligibleRow> = records
        .iter()
        .filter(|r| r.meals_included())
        .map(MealEligibleRow)
        .collect();
    let arrivals = analytics::daily_arrivals(records).arrivals_by_date;
    let contacts: Vec<ContactRow> = records.iter().map(ContactRow).collect();

    ReportWorkbook::new("Master Report")
        .with_dataset(Dataset::from_rows(MASTER_SHEETS[0], &all))
        .with_dataset(Dataset::from_rows(MASTER_SHEETS[1], &accommodation))
        .with_dataset(Dataset::from_rows(MASTER_SHEETS[2], &meals))
        .with_dataset(Dataset::from_rows(MASTER_SHEETS[3], &arrivals))
        .with_dataset(Dataset::from_rows(MASTER_SHEETS[4], &contacts))
}

/// Dashboard aggregates, one sheet each
pub fn analytics_report(records: &[Registration], ctx: &AnalyticsContext) -> ReportWorkbook {
    let DashboardAnalytics {
        trend,
        arrivals,
        meals,
        accommodation,
        nationality,
        branches,
        units,
        ..
    } = analytics::dashboard(records, ctx);

    ReportWorkbook::new("Analytics Report")
        .with_dataset(Dataset::from_rows("Registration Trend", &trend.buckets))
        .with_dataset(Dataset::from_rows("Arrivals", &arrivals.arrivals_by_date))
        .with_dataset(Dataset::from_rows("Meals", &meals.days))
        .with_dataset(Dataset::from_rows("Occupancy", &accommodation.nights))
        .with_dataset(Dataset::from_rows("Nationality", &nationality.entries))
        .with_dataset(Dataset::from_rows("Branches", &branches.entries))
        .with_dataset(Dataset::from_rows("Units", &units.entries))
}
