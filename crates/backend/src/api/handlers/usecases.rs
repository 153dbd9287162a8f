use axum::extract::State;
use axum::Json;
use contracts::shared::period::ReportRequest;
use contracts::usecases::u400_generate_report::GenerateReportResponse;

use crate::api::AppState;
use crate::shared::error::ReportError;
use crate::usecases::u400_generate_report;

// ============================================================================
// UseCase u400: Generate report document
// ============================================================================

/// POST /api/u400/generate
///
/// A client that disconnects drops this future, which stops the work. Server
/// shutdown cancels through `AppState::shutdown`.
pub async fn u400_generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<GenerateReportResponse>, ReportError> {
    let report = u400_generate_report::execute(
        state.store.as_ref(),
        state.artifacts.as_ref(),
        &state.settings,
        request,
        state.shutdown.clone(),
    )
    .await?;
    Ok(Json(report.response))
}
