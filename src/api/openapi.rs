//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{badges, exports, health, registrations, stats, support};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Regdesk API",
        version = "1.0.0",
        description = "Conference registration administration REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Registrations
        registrations::list_registrations,
        registrations::get_registration,
        // Stats
        stats::get_dashboard,
        stats::get_trend,
        stats::get_arrivals,
        stats::get_meals,
        stats::get_accommodation,
        stats::get_nationality,
        stats::get_branches,
        stats::get_units,
        stats::get_modes,
        // Exports
        exports::export_registrations,
        exports::export_master,
        exports::export_analytics,
        // Badges
        badges::generate_badge,
        badges::regenerate_badge,
        badges::download_badge,
        // Support
        support::create_session,
        support::load_session,
        support::clear_session,
    ),
    components(
        schemas(
            // Registrations
            crate::models::Registration,
            crate::models::ParticipationMode,
            crate::models::LocationType,
            crate::models::AccommodationType,
            crate::models::RegistrationFilter,
            crate::models::RegistrationQuery,
            registrations::RegistrationPage,
            // Stats
            crate::analytics::DashboardAnalytics,
            crate::analytics::RegistrationTrend,
            crate::analytics::TrendBucket,
            crate::analytics::DailyArrivals,
            crate::analytics::ArrivalBucket,
            crate::analytics::MealRequirements,
            crate::analytics::MealDay,
            crate::analytics::AccommodationOccupancy,
            crate::analytics::OccupancyNight,
            crate::analytics::Breakdown,
            crate::analytics::BreakdownEntry,
            crate::analytics::ModeBreakdown,
            // Badges
            crate::models::BadgeResponse,
            crate::models::BadgeState,
            // Support
            crate::models::SessionHandle,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "registrations", description = "Attendee registrations"),
        (name = "stats", description = "Registration analytics"),
        (name = "exports", description = "Spreadsheet reports"),
        (name = "badges", description = "Attendee badges"),
        (name = "support", description = "Support chat sessions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
