//! Registration trend over time

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::{dates, round1, AnalyticsContext};
use crate::models::{ParticipationMode, Registration};

/// Number of trailing buckets averaged into the current rate
const RATE_WINDOW: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct TrendBucket {
    /// Local day (YYYY-MM-DD); empty for the placeholder peak of an empty trend
    pub date: String,
    pub online_count: i64,
    pub onsite_count: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegistrationTrend {
    pub buckets: Vec<TrendBucket>,
    pub total_online: i64,
    pub total_onsite: i64,
    pub total: i64,
    pub peak_day: TrendBucket,
    /// Average daily registrations over the last 7 days that had any
    pub current_rate: f64,
    pub days_remaining: i64,
    pub projection: i64,
}

/// Registrations per local day, with a naive projection to the event date.
///
/// The rate averages the last seven *buckets*, not the last seven calendar
/// days: days without registrations have no bucket, so sparse data pushes
/// the rate up.
pub fn registration_trend(records: &[Registration], ctx: &AnalyticsContext) -> RegistrationTrend {
    let mut per_day: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for record in records {
        let entry = per_day
            .entry(dates::local_day(&record.created_at, ctx.timezone))
            .or_insert((0, 0));
        match record.participation_mode {
            ParticipationMode::Online => entry.0 += 1,
            ParticipationMode::Onsite => entry.1 += 1,
        }
    }

    let buckets: Vec<TrendBucket> = per_day
        .into_iter()
        .map(|(day, (online, onsite))| TrendBucket {
            date: dates::date_key(day),
            online_count: online,
            onsite_count: onsite,
            total: online + onsite,
        })
        .collect();

    let total_online: i64 = buckets.iter().map(|b| b.online_count).sum();
    let total_onsite: i64 = buckets.iter().map(|b| b.onsite_count).sum();
    let total = total_online + total_onsite;

    let mut peak_day = TrendBucket::default();
    for bucket in &buckets {
        if bucket.total > peak_day.total {
            peak_day = bucket.clone();
        }
    }

    let window = &buckets[buckets.len().saturating_sub(RATE_WINDOW)..];
    let current_rate = if window.is_empty() {
        0.0
    } else {
        round1(window.iter().map(|b| b.total).sum::<i64>() as f64 / window.len() as f64)
    };

    let days_remaining = (ctx.event_date - ctx.today).num_days().max(0);
    let projection = (total as f64 + current_rate * days_remaining as f64).round() as i64;

    RegistrationTrend {
        buckets,
        total_online,
        total_onsite,
        total,
        peak_day,
        current_rate,
        days_remaining,
        projection,
    }
}
