use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d402_clients_report::ClientsReport;
use contracts::shared::period::ReportRequest;

use crate::api::AppState;
use crate::dashboards::d402_clients_report::service;
use crate::shared::error::{validate_request, ReportError};

/// GET /api/d402/clients?start_date=..&end_date=..&granularity=monthly
pub async fn get_clients_report(
    State(state): State<AppState>,
    Query(request): Query<ReportRequest>,
) -> Result<Json<ClientsReport>, ReportError> {
    tracing::info!("D402 Dashboard: Getting clients for {}", request.range_label());
    validate_request(&request)?;

    let report = service::get_clients_report(state.store.as_ref(), &request).await?;
    tracing::info!(
        "D402 Dashboard: {} active clients, {} debtors",
        report.active_clients,
        report.top_debtors.len()
    );
    Ok(Json(report))
}
