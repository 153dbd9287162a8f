use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Period tag embedded in an artifact's file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriodTag {
    Weekly,
    Monthly,
    Yearly,
    Unknown,
}

impl ReportPeriodTag {
    /// Never fails: anything unrecognised is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "weekly" => ReportPeriodTag::Weekly,
            "monthly" => ReportPeriodTag::Monthly,
            "yearly" => ReportPeriodTag::Yearly,
            _ => ReportPeriodTag::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriodTag::Weekly => "weekly",
            ReportPeriodTag::Monthly => "monthly",
            ReportPeriodTag::Yearly => "yearly",
            ReportPeriodTag::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriodTag::Weekly => "Semanal",
            ReportPeriodTag::Monthly => "Mensual",
            ReportPeriodTag::Yearly => "Anual",
            ReportPeriodTag::Unknown => "General",
        }
    }
}

/// A generated report persisted in the artifact store. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportArtifact {
    /// Identifier inside the store; equal to the file name
    pub id: String,
    pub file_name: String,
    pub period: ReportPeriodTag,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Human readable size, e.g. `"1.5 KB"`
    pub size_label: String,
    /// Where the UI can fetch the document from
    pub locator: String,
}
