use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d401_orders_report::OrdersReport;
use contracts::shared::period::ReportRequest;

use crate::api::AppState;
use crate::dashboards::d401_orders_report::service;
use crate::shared::error::{validate_request, ReportError};

/// GET /api/d401/orders?start_date=..&end_date=..&granularity=weekly
pub async fn get_orders_report(
    State(state): State<AppState>,
    Query(request): Query<ReportRequest>,
) -> Result<Json<OrdersReport>, ReportError> {
    tracing::info!("D401 Dashboard: Getting orders for {}", request.range_label());
    validate_request(&request)?;

    let report = service::get_orders_report(state.store.as_ref(), &request).await?;
    tracing::info!(
        "D401 Dashboard: Returning {} periods",
        report.orders_over_time.len()
    );
    Ok(Json(report))
}
