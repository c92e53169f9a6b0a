//! Support chat session handles
//!
//! The server keeps no session state. Clients hold the handle and present
//! its id; these endpoints only create, validate and clear handles.

use axum::{extract::Path, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::SessionHandle,
};

/// Start a new support session
#[utoipa::path(
    post,
    path = "/support/sessions",
    tag = "support",
    responses(
        (status = 201, description = "Session created", body = SessionHandle)
    )
)]
pub async fn create_session() -> (StatusCode, Json<SessionHandle>) {
    let handle = SessionHandle::create(Utc::now());
    tracing::debug!(session_id = ?handle.id, "Support session created");
    (StatusCode::CREATED, Json(handle))
}

/// Resume a session from the id the client stored
#[utoipa::path(
    get,
    path = "/support/sessions/{id}",
    tag = "support",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session handle", body = SessionHandle),
        (status = 400, description = "Malformed session id")
    )
)]
pub async fn load_session(Path(id): Path<String>) -> AppResult<Json<SessionHandle>> {
    let handle = parse(&id)?;
    Ok(Json(handle))
}

/// End a session; returns the cleared handle
#[utoipa::path(
    delete,
    path = "/support/sessions/{id}",
    tag = "support",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Cleared handle", body = SessionHandle),
        (status = 400, description = "Malformed session id")
    )
)]
pub async fn clear_session(Path(id): Path<String>) -> AppResult<Json<SessionHandle>> {
    let handle = parse(&id)?;
    tracing::debug!(session_id = ?handle.id, "Support session cleared");
    Ok(Json(handle.clear()))
}

fn parse(id: &str) -> AppResult<SessionHandle> {
    SessionHandle::load(id, None)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid session id: {}", id)))
}
