use super::locale;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How finely trend series are bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Buckets by day of week
    Weekly,
    /// Buckets by ISO week number
    Monthly,
    /// Buckets by month
    Yearly,
}

impl Granularity {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            _ => Err(format!("Unknown granularity: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }
}

/// `{start_date, end_date, granularity}` tuple the UI sends for every report.
///
/// Both ends are inclusive calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub granularity: Granularity,
}

impl ReportRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, granularity: Granularity) -> Self {
        Self {
            start_date,
            end_date,
            granularity,
        }
    }

    /// Range covering the week (Monday–Sunday), month or year around `anchor`.
    pub fn for_period(granularity: Granularity, anchor: NaiveDate) -> Self {
        let (start, end) = match granularity {
            Granularity::Weekly => {
                let start =
                    anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(6))
            }
            Granularity::Monthly => {
                let start = anchor.with_day(1).unwrap_or(anchor);
                (start, last_day_of_month(anchor.year(), anchor.month()))
            }
            Granularity::Yearly => (
                NaiveDate::from_ymd_opt(anchor.year(), 1, 1).unwrap_or(anchor),
                NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap_or(anchor),
            ),
        };
        Self::new(start, end, granularity)
    }

    pub fn is_valid(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Calendar days in the range, both ends included; `0` for an inverted range.
    pub fn day_count(&self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        ((self.end_date - self.start_date).num_days() + 1) as u32
    }

    /// Every calendar day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start_date;
        (0..self.day_count() as i64).map(move |offset| start + Duration::days(offset))
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// A timestamp on either boundary date is inside the range.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date())
    }

    /// `"02/06/2025 - 08/06/2025"`
    pub fn range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%d/%m/%Y"),
            self.end_date.format("%d/%m/%Y")
        )
    }

    /// Human label of the period: `"2 jun - 8 jun 2025"`, `"junio 2025"`, `"2025"`.
    pub fn period_label(&self) -> String {
        match self.granularity {
            Granularity::Weekly => format!(
                "{} {} - {} {} {}",
                self.start_date.day(),
                locale::month_short(&self.start_date),
                self.end_date.day(),
                locale::month_short(&self.end_date),
                self.end_date.year()
            ),
            Granularity::Monthly => format!(
                "{} {}",
                locale::month_long(&self.start_date),
                self.start_date.year()
            ),
            Granularity::Yearly => self.start_date.year().to_string(),
        }
    }
}

/// Last calendar day of a month
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MIN)
}
