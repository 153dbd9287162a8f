use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use contracts::dashboards::d403_attendance_report::{
    AttendanceOverview, AttendanceReport, DailyAttendance, EmployeeAttendance, PunctualityCategory,
    PunctualityShare, WeekdayAttendance,
};
use contracts::domain::a003_staff::Staff;
use contracts::domain::a004_attendance::Attendance;
use contracts::shared::locale;
use contracts::shared::period::ReportRequest;
use std::collections::HashSet;

use crate::shared::data::DataStore;
use crate::shared::error::{ReportError, ReportSection};
use crate::shared::rates;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Attendance figures; check-ins after `work_start` count as late
pub async fn get_attendance_report(
    store: &dyn DataStore,
    request: &ReportRequest,
    work_start: NaiveTime,
) -> Result<AttendanceReport, ReportError> {
    let fail = |e| ReportError::data_fetch(ReportSection::Attendance, request, e);
    let (staff, attendance) =
        tokio::try_join!(store.query_staff(true), store.query_attendance(request)).map_err(fail)?;
    Ok(compute_attendance(request, &staff, &attendance, work_start))
}

pub fn compute_attendance(
    request: &ReportRequest,
    staff: &[Staff],
    attendance: &[Attendance],
    work_start: NaiveTime,
) -> AttendanceReport {
    let active: Vec<&Staff> = staff.iter().filter(|s| s.is_active).collect();
    let records: Vec<&Attendance> = attendance
        .iter()
        .filter(|a| request.contains_date(a.date))
        .collect();

    let days = request.day_count();
    let expected = count_u32(active.len()).saturating_mul(days);
    let actual = count_u32(records.len());
    let attendance_rate = rates::percent(actual as f64, expected as f64);
    let total_absences = expected.saturating_sub(actual);

    let mut late_arrivals = 0u32;
    let mut late_minutes = 0i64;
    let mut total_hours = 0i64;
    for record in &records {
        let reference = record.check_in.date().and_time(work_start);
        if record.check_in > reference {
            late_arrivals += 1;
            late_minutes += (record.check_in - reference).num_minutes();
        }
        if let Some(check_out) = record.check_out {
            total_hours += (check_out - record.check_in).num_hours().max(0);
        }
    }

    let overview = AttendanceOverview {
        attendance_rate,
        expected_attendance: expected,
        actual_attendance: actual,
        total_absences,
        late_arrivals,
        average_late_minutes: rates::mean_rounded(late_minutes as f64, late_arrivals as usize),
        total_hours_worked: u32::try_from(total_hours).unwrap_or(u32::MAX),
        average_hours_per_day: rates::mean_rounded(total_hours as f64, records.len()),
        average_check_in: average_clock(records.iter().map(|r| r.check_in.time())),
        average_check_out: average_clock(records.iter().filter_map(|r| r.check_out.map(|t| t.time()))),
    };

    let daily = request
        .days()
        .map(|day| {
            let present = records.iter().filter(|r| r.date == day).count();
            DailyAttendance {
                date: day,
                attendance_rate: rates::percent(present as f64, active.len() as f64),
                average_attendance: attendance_rate,
            }
        })
        .collect();

    let mut by_employee: Vec<EmployeeAttendance> = active
        .iter()
        .map(|s| {
            let worked = records
                .iter()
                .filter(|r| r.staff_id == s.id)
                .map(|r| r.date)
                .collect::<HashSet<_>>()
                .len() as u32;
            EmployeeAttendance {
                staff_id: s.id,
                name: s.full_name(),
                position: s.position.clone(),
                attendance_rate: rates::percent(worked as f64, days as f64),
                days_worked: worked,
                total_days: days,
            }
        })
        .collect();
    by_employee.sort_by(|a, b| b.attendance_rate.cmp(&a.attendance_rate));

    let by_day_of_week = WEEK
        .iter()
        .map(|weekday| {
            let occurrences = request.days().filter(|d| d.weekday() == *weekday).count();
            let present = records.iter().filter(|r| r.date.weekday() == *weekday).count();
            WeekdayAttendance {
                day: locale::capitalize(locale::weekday_name(*weekday)),
                attendance_rate: rates::percent(present as f64, active.len() as f64 * occurrences as f64),
            }
        })
        .collect();

    let punctuality = [
        (PunctualityCategory::Present, actual.saturating_sub(late_arrivals)),
        (PunctualityCategory::Late, late_arrivals),
        (PunctualityCategory::Absent, total_absences),
    ]
    .into_iter()
    .map(|(category, count)| PunctualityShare {
        category,
        name: category.label().to_string(),
        count,
    })
    .collect();

    AttendanceReport {
        overview,
        daily,
        by_employee,
        by_day_of_week,
        punctuality,
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Mean clock time as `HH:MM`, `None` for an empty sample
fn average_clock(times: impl Iterator<Item = NaiveTime>) -> Option<String> {
    let (sum, count) = times.fold((0u64, 0u64), |(sum, count), t| {
        (sum + t.num_seconds_from_midnight() as u64, count + 1)
    });
    if count == 0 {
        return None;
    }
    let mean = sum / count;
    Some(format!("{:02}:{:02}", mean / 3600, (mean % 3600) / 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::fixtures::*;

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn test_no_staff_no_records() {
        let report = compute_attendance(&june_week(), &[], &[], nine());

        assert_eq!(report.overview.attendance_rate, 0);
        assert_eq!(report.overview.expected_attendance, 0);
        assert_eq!(report.overview.total_absences, 0);
        assert_eq!(report.overview.average_hours_per_day, 0);
        assert_eq!(report.overview.average_check_in, None);
        assert_eq!(report.daily.len(), 7);
        assert!(report.daily.iter().all(|d| d.attendance_rate == 0));
        assert!(report.by_day_of_week.iter().all(|d| d.attendance_rate == 0));
    }

    #[test]
    fn test_late_check_in_counts_minutes() {
        let luis = staff("Luis", true);
        let records = vec![attendance(&luis, at(6, 3, 9, 15), Some(at(6, 3, 17, 45)))];

        let report = compute_attendance(&june_week(), &[luis], &records, nine());

        assert_eq!(report.overview.late_arrivals, 1);
        assert_eq!(report.overview.average_late_minutes, 15);
        assert_eq!(report.overview.total_hours_worked, 8);
        assert_eq!(report.overview.average_check_in.as_deref(), Some("09:15"));
        assert_eq!(report.overview.average_check_out.as_deref(), Some("17:45"));
        let late = &report.punctuality[1];
        assert_eq!(late.category, PunctualityCategory::Late);
        assert_eq!(late.count, 1);
    }

    #[test]
    fn test_open_record_counts_as_present_without_hours() {
        let luis = staff("Luis", true);
        let ana = staff("Ana", true);
        let records = vec![
            attendance(&luis, at(6, 2, 8, 30), Some(at(6, 2, 16, 30))),
            attendance(&ana, at(6, 2, 8, 50), None),
        ];

        let report = compute_attendance(&june_week(), &[luis, ana], &records, nine());

        assert_eq!(report.overview.actual_attendance, 2);
        assert_eq!(report.overview.expected_attendance, 14);
        assert_eq!(report.overview.total_absences, 12);
        assert_eq!(report.overview.attendance_rate, 14);
        assert_eq!(report.overview.total_hours_worked, 8);
        assert_eq!(report.overview.average_hours_per_day, 4);
        assert_eq!(report.overview.average_check_in.as_deref(), Some("08:40"));
        assert_eq!(report.overview.average_check_out.as_deref(), Some("16:30"));
        assert_eq!(report.daily[0].attendance_rate, 100);
        assert_eq!(report.daily[0].average_attendance, 14);
        assert_eq!(report.by_day_of_week[0].day, "Lunes");
        assert_eq!(report.by_day_of_week[0].attendance_rate, 100);

        let present: Vec<_> = report.punctuality.iter().map(|p| p.count).collect();
        assert_eq!(present, vec![2, 0, 12]);
    }

    #[test]
    fn test_employees_sorted_by_rate_with_distinct_days() {
        let luis = staff("Luis", true);
        let ana = staff("Ana", true);
        let mut records = vec![
            attendance(&luis, at(6, 2, 9, 0), None),
            // second punch on the same day
            attendance(&luis, at(6, 2, 13, 0), None),
        ];
        records.extend((2..=5).map(|d| attendance(&ana, at(6, d, 8, 55), None)));

        let report = compute_attendance(&june_week(), &[luis, ana], &records, nine());

        assert_eq!(report.by_employee[0].name, "Ana Pérez");
        assert_eq!(report.by_employee[0].days_worked, 4);
        assert_eq!(report.by_employee[0].attendance_rate, 57);
        assert_eq!(report.by_employee[1].days_worked, 1);
        assert_eq!(report.by_employee[1].total_days, 7);
        // 13:00 punch is late
        assert_eq!(report.overview.late_arrivals, 1);
    }

    #[test]
    fn test_over_attendance_saturates_absences() {
        let luis = staff("Luis", true);
        let records: Vec<_> = (0..3)
            .map(|h| attendance(&luis, at(6, 2, 8, h), None))
            .collect();
        let one_day = ReportRequest::new(date(6, 2), date(6, 2), contracts::shared::period::Granularity::Weekly);

        let report = compute_attendance(&one_day, &[luis], &records, nine());

        assert_eq!(report.overview.total_absences, 0);
        assert_eq!(report.overview.attendance_rate, 300);
    }

    #[test]
    fn test_expected_attendance_saturates_on_huge_input() {
        let start = chrono::NaiveDate::from_ymd_opt(1800, 1, 1).unwrap();
        let wide = ReportRequest::new(
            start,
            start + chrono::Duration::days(99_999),
            contracts::shared::period::Granularity::Yearly,
        );
        let crew: Vec<_> = (0..50_000).map(|i| staff(&format!("E{}", i), true)).collect();

        let report = compute_attendance(&wide, &crew, &[], nine());

        assert_eq!(report.overview.expected_attendance, u32::MAX);
        assert_eq!(report.overview.total_absences, u32::MAX);
        assert_eq!(report.overview.attendance_rate, 0);
    }
}
