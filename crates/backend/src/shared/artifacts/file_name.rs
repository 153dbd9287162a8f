//! Artifact names: `reporte_completo_{period}_{yyyy-MM-dd}_{unix_millis}.pdf`

use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a006_report_artifact::ReportPeriodTag;

const PREFIX: &str = "reporte_completo";
const EXTENSION: &str = ".pdf";

pub fn build_file_name(period: ReportPeriodTag, anchor: NaiveDate, created_at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}_{}{}",
        PREFIX,
        period.as_str(),
        anchor.format("%Y-%m-%d"),
        created_at.timestamp_millis(),
        EXTENSION
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFileName {
    pub period: ReportPeriodTag,
    /// `None` when the name carries neither a timestamp nor a date
    pub created_at: Option<DateTime<Utc>>,
}

/// Best-effort parse. Creation time comes from the millis token, else the
/// date token (midnight UTC).
pub fn parse_file_name(name: &str) -> ParsedFileName {
    let stem = name.strip_suffix(EXTENSION).unwrap_or(name);
    let tokens: Vec<&str> = stem.split('_').collect();

    let period = tokens
        .iter()
        .map(|t| ReportPeriodTag::parse(t))
        .find(|p| *p != ReportPeriodTag::Unknown)
        .unwrap_or(ReportPeriodTag::Unknown);

    let from_millis = tokens
        .last()
        .filter(|t| t.len() >= 10 && t.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|t| t.parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    let created_at = from_millis.or_else(|| {
        tokens
            .iter()
            .find_map(|t| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    });

    ParsedFileName { period, created_at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_and_parse() {
        let created = Utc.timestamp_millis_opt(1_749_024_000_123).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();

        let name = build_file_name(ReportPeriodTag::Weekly, anchor, created);
        assert_eq!(name, "reporte_completo_weekly_2025-06-04_1749024000123.pdf");

        let parsed = parse_file_name(&name);
        assert_eq!(parsed.period, ReportPeriodTag::Weekly);
        assert_eq!(parsed.created_at, Some(created));
    }

    #[test]
    fn test_falls_back_to_date_token() {
        let parsed = parse_file_name("reporte_monthly_2024-02-01.pdf");
        assert_eq!(parsed.period, ReportPeriodTag::Monthly);
        assert_eq!(
            parsed.created_at,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_name() {
        let parsed = parse_file_name("notas.txt");
        assert_eq!(parsed.period, ReportPeriodTag::Unknown);
        assert_eq!(parsed.created_at, None);
    }
}
