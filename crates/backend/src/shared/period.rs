//! Groups timestamped records into labelled time buckets.
//!
//! | granularity | bucket             | label example |
//! |-------------|--------------------|---------------|
//! | weekly      | day of week        | `Lunes`       |
//! | monthly     | ISO week number    | `Semana 23`   |
//! | yearly      | month              | `Jun`         |

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::shared::locale;
use contracts::shared::period::{Granularity, ReportRequest};

/// Records sharing one period label
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<'a, T> {
    pub label: String,
    pub items: Vec<&'a T>,
}

impl<T> Bucket<'_, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn bucket_label(granularity: Granularity, date: NaiveDate) -> String {
    match granularity {
        Granularity::Weekly => locale::capitalize(locale::weekday_name(date.weekday())),
        Granularity::Monthly => format!("Semana {}", date.iso_week().week()),
        Granularity::Yearly => locale::capitalize(locale::month_short(&date)),
    }
}

/// Bucket the in-range `records` by `request.granularity`.
///
/// Records are visited in chronological order (ties keep input order), and
/// buckets come out in order of their first record. Records outside the
/// request range are left out; every record inside lands in exactly one bucket.
pub fn group_by_period<'a, T, F>(records: &'a [T], request: &ReportRequest, timestamp: F) -> Vec<Bucket<'a, T>>
where
    F: Fn(&T) -> NaiveDateTime,
{
    let mut in_range: Vec<&'a T> = records
        .iter()
        .filter(|r| request.contains(timestamp(*r)))
        .collect();
    in_range.sort_by_key(|r| timestamp(*r));

    let mut buckets: Vec<Bucket<'a, T>> = Vec::new();
    for record in in_range {
        let label = bucket_label(request.granularity, timestamp(record).date());
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.items.push(record),
            None => buckets.push(Bucket {
                label,
                items: vec![record],
            }),
        }
    }
    buckets
}
