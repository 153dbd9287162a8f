use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use contracts::domain::a006_report_artifact::ReportArtifact;

use crate::api::AppState;
use crate::shared::artifacts::{self, DownloadOutcome};
use crate::shared::error::ReportError;

/// GET /api/reports/artifacts
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ReportArtifact>>, ReportError> {
    let items = state.artifacts.list().await?;
    tracing::info!("Listing {} stored reports", items.len());
    Ok(Json(items))
}

/// DELETE /api/reports/artifacts/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ReportError> {
    state.artifacts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reports/artifacts/:id/download
///
/// Sends the document as an attachment; if it cannot be read, redirects the
/// browser to its public locator instead.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ReportError> {
    match artifacts::download(state.artifacts.as_ref(), &id).await? {
        DownloadOutcome::Bytes { file_name, bytes } => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
            ],
            Body::from(bytes),
        )
            .into_response()),
        DownloadOutcome::OpenDirect { locator } => Ok(Redirect::temporary(&locator).into_response()),
    }
}

/// `attachment` with an RFC 5987 encoded name plus an ASCII fallback
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}
