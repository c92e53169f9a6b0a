//! Regdesk Server - conference registration administration
//!
//! REST API for registration analytics, reports and badges.

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regdesk::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Regdesk Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        event = %config.event.name,
        start = %config.event.start_date,
        end = %config.event.end_date,
        timezone = %config.event.timezone,
        "Event configured"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config)
        .await
        .context("Failed to create services")?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("regdesk={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Registrations
        .route("/registrations", get(api::registrations::list_registrations))
        .route("/registrations/:id", get(api::registrations::get_registration))
        // Badges
        .route(
            "/registrations/:id/badge",
            post(api::badges::generate_badge).put(api::badges::regenerate_badge),
        )
        .route("/registrations/:id/badge.png", get(api::badges::download_badge))
        // Statistics
        .route("/stats/dashboard", get(api::stats::get_dashboard))
        .route("/stats/trend", get(api::stats::get_trend))
        .route("/stats/arrivals", get(api::stats::get_arrivals))
        .route("/stats/meals", get(api::stats::get_meals))
        .route("/stats/accommodation", get(api::stats::get_accommodation))
        .route("/stats/nationality", get(api::stats::get_nationality))
        .route("/stats/branches", get(api::stats::get_branches))
        .route("/stats/units", get(api::stats::get_units))
        .route("/stats/modes", get(api::stats::get_modes))
        // Exports
        .route("/exports/registrations", get(api::exports::export_registrations))
        .route("/exports/master", get(api::exports::export_master))
        .route("/exports/analytics", get(api::exports::export_analytics))
        // Support sessions
        .route("/support/sessions", post(api::support::create_session))
        .route(
            "/support/sessions/:id",
            get(api::support::load_session).delete(api::support::clear_session),
        )
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
