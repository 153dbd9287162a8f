use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d403_attendance_report::AttendanceReport;
use contracts::shared::period::ReportRequest;

use crate::api::AppState;
use crate::dashboards::d403_attendance_report::service;
use crate::shared::error::{validate_request, ReportError};

/// GET /api/d403/attendance?start_date=..&end_date=..&granularity=weekly
pub async fn get_attendance_report(
    State(state): State<AppState>,
    Query(request): Query<ReportRequest>,
) -> Result<Json<AttendanceReport>, ReportError> {
    tracing::info!("D403 Dashboard: Getting attendance for {}", request.range_label());
    validate_request(&request)?;

    let report =
        service::get_attendance_report(state.store.as_ref(), &request, state.settings.work_start).await?;
    tracing::info!(
        "D403 Dashboard: rate {}%, {} late arrivals",
        report.overview.attendance_rate,
        report.overview.late_arrivals
    );
    Ok(Json(report))
}
