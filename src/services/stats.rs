//! Statistics service

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{
    analytics::{
        self, dates, AccommodationOccupancy, AnalyticsContext, Breakdown, DailyArrivals,
        DashboardAnalytics, MealRequirements, ModeBreakdown, RegistrationTrend,
    },
    config::EventConfig,
    error::AppResult,
    models::{Registration, RegistrationFilter},
    repository::Repository,
};

/// Filtered registrations together with the context they are analysed in
pub struct Snapshot {
    pub records: Vec<Registration>,
    pub context: AnalyticsContext,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    event: EventConfig,
}

impl StatsService {
    pub fn new(repository: Repository, event: EventConfig) -> Self {
        Self { repository, event }
    }

    /// Analytics context for the given instant
    pub fn context_at(&self, now: DateTime<Utc>) -> AnalyticsContext {
        AnalyticsContext::new(&self.event, dates::local_day(&now, self.event.timezone))
    }

    /// Wall-clock time at the event, used to stamp report file names
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.event.timezone).naive_local()
    }

    /// Fetch all registrations and keep those passing `filter`
    pub async fn snapshot(&self, filter: &RegistrationFilter) -> AppResult<Snapshot> {
        let all = self.repository.registrations.list_all().await?;
        let records = if filter.is_empty() {
            all
        } else {
            analytics::apply_filter(&all, filter, self.event.timezone)
        };
        tracing::debug!(records = records.len(), "Registration snapshot loaded");
        Ok(Snapshot {
            records,
            context: self.context_at(Utc::now()),
        })
    }

    pub async fn dashboard(&self, filter: &RegistrationFilter) -> AppResult<DashboardAnalytics> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::dashboard(&s.records, &s.context))
    }

    pub async fn trend(&self, filter: &RegistrationFilter) -> AppResult<RegistrationTrend> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::registration_trend(&s.records, &s.context))
    }

    pub async fn arrivals(&self, filter: &RegistrationFilter) -> AppResult<DailyArrivals> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::daily_arrivals(&s.records))
    }

    pub async fn meals(&self, filter: &RegistrationFilter) -> AppResult<MealRequirements> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::meal_requirements(&s.records, &s.context))
    }

    pub async fn accommodation(
        &self,
        filter: &RegistrationFilter,
    ) -> AppResult<AccommodationOccupancy> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::accommodation_occupancy(&s.records, &s.context))
    }

    pub async fn nationality(&self, filter: &RegistrationFilter) -> AppResult<Breakdown> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::nationality_breakdown(&s.records, &s.context.home_country))
    }

    pub async fn branches(&self, filter: &RegistrationFilter) -> AppResult<Breakdown> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::branch_distribution(&s.records))
    }

    pub async fn units(&self, filter: &RegistrationFilter) -> AppResult<Breakdown> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::unit_distribution(&s.records))
    }

    pub async fn modes(&self, filter: &RegistrationFilter) -> AppResult<ModeBreakdown> {
        let s = self.snapshot(filter).await?;
        Ok(analytics::mode_breakdown(&s.records))
    }
}
