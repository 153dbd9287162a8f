use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d400_summary_report::SummaryReport;
use contracts::shared::period::ReportRequest;

use crate::api::AppState;
use crate::dashboards::d400_summary_report::service;
use crate::shared::error::{validate_request, ReportError};

/// GET /api/d400/summary?start_date=2025-06-01&end_date=2025-06-30&granularity=monthly
pub async fn get_summary_report(
    State(state): State<AppState>,
    Query(request): Query<ReportRequest>,
) -> Result<Json<SummaryReport>, ReportError> {
    tracing::info!("D400 Dashboard: Getting summary for {}", request.range_label());
    validate_request(&request)?;

    let report = service::get_summary_report(state.store.as_ref(), &request).await?;
    tracing::info!(
        "D400 Dashboard: {} orders, revenue {:.2}",
        report.total_orders,
        report.total_revenue
    );
    Ok(Json(report))
}
