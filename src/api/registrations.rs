//! Registration endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Registration, RegistrationQuery},
    AppState,
};

use super::AuthenticatedUser;

/// One page of registrations
#[derive(Serialize, ToSchema)]
pub struct RegistrationPage {
    pub items: Vec<Registration>,
    /// Total matching registrations
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List registrations with search and pagination
#[utoipa::path(
    get,
    path = "/registrations",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Page of registrations", body = RegistrationPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RegistrationQuery>,
) -> AppResult<Json<RegistrationPage>> {
    claims.require_read_registrations()?;

    let (items, total) = state.services.repository.registrations.search(&query).await?;

    Ok(Json(RegistrationPage {
        items,
        total,
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 200),
    }))
}

/// Get registration by ID
#[utoipa::path(
    get,
    path = "/registrations/{id}",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration details", body = Registration),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn get_registration(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Registration>> {
    claims.require_read_registrations()?;

    let registration = state.services.repository.registrations.get_by_id(id).await?;
    Ok(Json(registration))
}
