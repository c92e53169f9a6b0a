//! Regdesk conference registration server
//!
//! Administrative REST API over attendee registrations: dashboard analytics,
//! spreadsheet reports and printable attendee badges.

use std::sync::Arc;

pub mod analytics;
pub mod api;
pub mod badge;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
