//! Badge endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{error::AppResult, models::BadgeResponse, services::badges::BadgeImage, AppState};

use super::AuthenticatedUser;

impl IntoResponse for BadgeImage {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.png,
        )
            .into_response()
    }
}

/// Issue a badge to an onsite attendee
#[utoipa::path(
    post,
    path = "/registrations/{id}/badge",
    tag = "badges",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 201, description = "Badge generated", body = BadgeResponse),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Registration already has a badge"),
        (status = 422, description = "Attendee is not onsite")
    )
)]
pub async fn generate_badge(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<BadgeResponse>)> {
    claims.require_issue_badges()?;

    let badge = state.services.badges.generate(id).await?;
    Ok((StatusCode::CREATED, Json(badge)))
}

/// Re-render an existing badge under the same number
#[utoipa::path(
    put,
    path = "/registrations/{id}/badge",
    tag = "badges",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Badge regenerated", body = BadgeResponse),
        (status = 404, description = "Registration not found"),
        (status = 422, description = "Registration has no badge yet")
    )
)]
pub async fn regenerate_badge(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BadgeResponse>> {
    claims.require_issue_badges()?;

    let badge = state.services.badges.regenerate(id).await?;
    Ok(Json(badge))
}

/// Render the badge PNG for printing; nothing is stored
#[utoipa::path(
    get,
    path = "/registrations/{id}/badge.png",
    tag = "badges",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Badge image", content_type = "image/png"),
        (status = 404, description = "Registration not found"),
        (status = 422, description = "Registration has no badge yet")
    )
)]
pub async fn download_badge(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<BadgeImage> {
    claims.require_read_registrations()?;
    state.services.badges.download(id).await
}
