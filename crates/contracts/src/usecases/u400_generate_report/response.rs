use crate::domain::a006_report_artifact::ReportPeriodTag;
use serde::{Deserialize, Serialize};

/// Result of generating and storing one report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReportResponse {
    pub file_name: String,
    pub period: ReportPeriodTag,
    /// Where the stored document can be fetched from later
    pub locator: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub pages: u32,
}
