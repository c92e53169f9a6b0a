//! Registration analytics endpoints
//!
//! Every endpoint accepts the same filter query parameters and recomputes
//! its aggregate from a fresh snapshot of the registrations.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    analytics::{
        AccommodationOccupancy, Breakdown, DailyArrivals, DashboardAnalytics, MealRequirements,
        ModeBreakdown, RegistrationTrend,
    },
    error::AppResult,
    models::RegistrationFilter,
    AppState,
};

use super::AuthenticatedUser;

/// All dashboard aggregates in one response
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardAnalytics)
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<DashboardAnalytics>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.dashboard(&filter).await?))
}

/// Registrations per day with rate and projection
#[utoipa::path(
    get,
    path = "/stats/trend",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Registration trend", body = RegistrationTrend)
    )
)]
pub async fn get_trend(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<RegistrationTrend>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.trend(&filter).await?))
}

/// Onsite arrivals per day
#[utoipa::path(
    get,
    path = "/stats/arrivals",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Daily arrivals", body = DailyArrivals)
    )
)]
pub async fn get_arrivals(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<DailyArrivals>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.arrivals(&filter).await?))
}

/// Meals to prepare for each event day
#[utoipa::path(
    get,
    path = "/stats/meals",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Meal requirements", body = MealRequirements)
    )
)]
pub async fn get_meals(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<MealRequirements>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.meals(&filter).await?))
}

/// Nightly occupancy by accommodation type
#[utoipa::path(
    get,
    path = "/stats/accommodation",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Accommodation occupancy", body = AccommodationOccupancy)
    )
)]
pub async fn get_accommodation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<AccommodationOccupancy>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.accommodation(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/stats/nationality",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Registrations by nationality", body = Breakdown)
    )
)]
pub async fn get_nationality(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<Breakdown>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.nationality(&filter).await?))
}

/// Members by branch
#[utoipa::path(
    get,
    path = "/stats/branches",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Member registrations by branch", body = Breakdown)
    )
)]
pub async fn get_branches(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<Breakdown>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.branches(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/stats/units",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Registrations by church unit", body = Breakdown)
    )
)]
pub async fn get_units(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<Breakdown>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.units(&filter).await?))
}

/// Online/onsite and within/outside Zaria split
#[utoipa::path(
    get,
    path = "/stats/modes",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Participation mode breakdown", body = ModeBreakdown)
    )
)]
pub async fn get_modes(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<Json<ModeBreakdown>> {
    claims.require_read_registrations()?;
    Ok(Json(state.services.stats.modes(&filter).await?))
}
