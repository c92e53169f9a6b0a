//! Spreadsheet download endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::AppResult, models::RegistrationFilter, services::exports::ExportFile, AppState};

use super::AuthenticatedUser;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Filtered registrations as a single-sheet workbook
#[utoipa::path(
    get,
    path = "/exports/registrations",
    tag = "exports",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Workbook download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn export_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<ExportFile> {
    claims.require_read_registrations()?;
    state.services.exports.registrations(&filter).await
}

/// Master report: registrations, accommodation, meals, arrivals and contacts
#[utoipa::path(
    get,
    path = "/exports/master",
    tag = "exports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workbook download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn export_master(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<ExportFile> {
    claims.require_read_registrations()?;
    state.services.exports.master().await
}

/// Dashboard aggregates, one sheet each
#[utoipa::path(
    get,
    path = "/exports/analytics",
    tag = "exports",
    security(("bearer_auth" = [])),
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Workbook download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn export_analytics(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<RegistrationFilter>,
) -> AppResult<ExportFile> {
    claims.require_read_registrations()?;
    state.services.exports.analytics(&filter).await
}
