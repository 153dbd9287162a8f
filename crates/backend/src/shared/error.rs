use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::period::ReportRequest;
use serde::Serialize;
use thiserror::Error;

use super::artifacts::ArtifactError;
use super::data::DataFetchError;
use super::report_pdf::InvalidSectionError;

/// Report section a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    Summary,
    Orders,
    Clients,
    Attendance,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::Summary,
        ReportSection::Orders,
        ReportSection::Clients,
        ReportSection::Attendance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSection::Summary => "summary",
            ReportSection::Orders => "orders",
            ReportSection::Clients => "clients",
            ReportSection::Attendance => "attendance",
        }
    }

    /// Title of the section in the generated document
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Summary => "Resumen General",
            ReportSection::Orders => "Pedidos",
            ReportSection::Clients => "Clientes",
            ReportSection::Attendance => "Asistencia",
        }
    }
}

impl std::fmt::Display for ReportSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{section} report for {range}: {source}")]
    DataFetch {
        section: ReportSection,
        range: String,
        #[source]
        source: DataFetchError,
    },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    InvalidSection(#[from] InvalidSectionError),

    #[error("invalid report request: {0}")]
    InvalidRequest(String),

    #[error("report request cancelled")]
    Cancelled,
}

/// Longest range a report may cover, ten years of days
pub const MAX_RANGE_DAYS: u32 = 3_660;

/// Reject a range whose end is before its start or that spans more than
/// [`MAX_RANGE_DAYS`]
pub fn validate_request(request: &ReportRequest) -> Result<(), ReportError> {
    if !request.is_valid() {
        return Err(ReportError::InvalidRequest(format!(
            "end date {} is before start date {}",
            request.end_date, request.start_date
        )));
    }
    let days = request.day_count();
    if days > MAX_RANGE_DAYS {
        return Err(ReportError::InvalidRequest(format!(
            "range spans {} days, at most {} allowed",
            days, MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

impl ReportError {
    pub fn data_fetch(section: ReportSection, request: &ReportRequest, source: DataFetchError) -> Self {
        ReportError::DataFetch {
            section,
            range: request.range_label(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::DataFetch { .. } => StatusCode::BAD_GATEWAY,
            ReportError::Artifact(ArtifactError::NotFound(_)) => StatusCode::NOT_FOUND,
            ReportError::Artifact(ArtifactError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            ReportError::Artifact(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReportError::InvalidSection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // client closed request
            ReportError::Cancelled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
            }
        }
    }
}

/// JSON error body returned to the UI
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<ReportSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (section, range) = match &self {
            ReportError::DataFetch { section, range, .. } => (Some(*section), Some(range.clone())),
            _ => (None, None),
        };
        if status.is_server_error() {
            tracing::error!("Report request failed: {}", self);
        } else {
            tracing::warn!("Report request rejected: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            section,
            range,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::shared::period::Granularity;

    #[test]
    fn test_data_fetch_error_names_section_and_range() {
        let request = ReportRequest::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            Granularity::Monthly,
        );
        let err = ReportError::data_fetch(
            ReportSection::Clients,
            &request,
            DataFetchError::new("orders", "permission denied"),
        );
        assert_eq!(
            err.to_string(),
            "clients report for 01/06/2025 - 30/06/2025: failed to fetch orders: permission denied"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_range_length_is_capped() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let at_cap = ReportRequest::new(
            start,
            start + chrono::Duration::days(MAX_RANGE_DAYS as i64 - 1),
            Granularity::Yearly,
        );
        assert!(validate_request(&at_cap).is_ok());

        let over = ReportRequest::new(
            start,
            start + chrono::Duration::days(MAX_RANGE_DAYS as i64),
            Granularity::Yearly,
        );
        let err = validate_request(&over).unwrap_err();
        assert!(matches!(err, ReportError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "invalid report request: range spans 3661 days, at most 3660 allowed");

        let everything = ReportRequest::new(
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
            Granularity::Yearly,
        );
        assert_eq!(validate_request(&everything).unwrap_err().status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ReportError::Artifact(ArtifactError::NotFound("x.pdf".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ReportError::Cancelled.status_code().as_u16(), 499);
        assert_eq!(
            ReportError::InvalidRequest("end before start".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
