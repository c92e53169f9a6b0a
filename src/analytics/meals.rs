//! Meal requirement projection across the event days

use serde::Serialize;
use utoipa::ToSchema;

use super::{dates, AnalyticsContext};
use crate::models::Registration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MealDay {
    pub date: String,
    /// Eligible attendees present that day
    pub attendees: i64,
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MealRequirements {
    pub days: Vec<MealDay>,
    /// Onsite attendees from outside Zaria
    pub eligible_attendees: i64,
    /// Eligible attendees left out of the daily counts for lack of stay dates
    pub missing_dates: i64,
    pub total_breakfast: i64,
    pub total_lunch: i64,
    pub total_dinner: i64,
    pub total_meals: i64,
    pub peak_day: MealDay,
}

/// Daily meal counts over the event range.
///
/// A record is present on every day of `[arrival, departure]`, both ends
/// included, and takes one of each meal per day present.
pub fn meal_requirements(records: &[Registration], ctx: &AnalyticsContext) -> MealRequirements {
    let eligible: Vec<&Registration> = records.iter().filter(|r| r.meals_included()).collect();
    let windows: Vec<_> = eligible.iter().filter_map(|r| r.stay_window()).collect();
    let missing_dates = (eligible.len() - windows.len()) as i64;

    let days: Vec<MealDay> = dates::each_day(ctx.start_date, ctx.end_date)
        .map(|day| {
            let present = windows
                .iter()
                .filter(|(arrival, departure)| *arrival <= day && day <= *departure)
                .count() as i64;
            MealDay {
                date: dates::date_key(day),
                attendees: present,
                breakfast: present,
                lunch: present,
                dinner: present,
            }
        })
        .collect();

    let total_breakfast: i64 = days.iter().map(|d| d.breakfast).sum();
    let total_lunch: i64 = days.iter().map(|d| d.lunch).sum();
    let total_dinner: i64 = days.iter().map(|d| d.dinner).sum();

    let mut peak_day = MealDay::default();
    for day in &days {
        if day.attendees > peak_day.attendees {
            peak_day = day.clone();
        }
    }

    MealRequirements {
        days,
        eligible_attendees: eligible.len() as i64,
        missing_dates,
        total_breakfast,
        total_lunch,
        total_dinner,
        total_meals: total_breakfast + total_lunch + total_dinner,
        peak_day,
    }
}
