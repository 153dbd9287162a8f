use crate::domain::a003_staff::StaffId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub overview: AttendanceOverview,
    pub daily: Vec<DailyAttendance>,
    /// Sorted by attendance rate, best first
    pub by_employee: Vec<EmployeeAttendance>,
    /// Monday first
    pub by_day_of_week: Vec<WeekdayAttendance>,
    /// Always `present`, `late`, `absent`
    pub punctuality: Vec<PunctualityShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceOverview {
    /// Percent, rounded
    pub attendance_rate: u32,
    /// Active staff × calendar days in range
    pub expected_attendance: u32,
    pub actual_attendance: u32,
    pub total_absences: u32,
    pub late_arrivals: u32,
    pub average_late_minutes: u32,
    pub total_hours_worked: u32,
    pub average_hours_per_day: u32,
    /// `HH:MM`; `None` when there are no check-ins
    pub average_check_in: Option<String>,
    /// `HH:MM`; `None` when nobody checked out
    pub average_check_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub attendance_rate: u32,
    /// Period-wide rate, repeated for charting
    pub average_attendance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAttendance {
    pub staff_id: StaffId,
    pub name: String,
    pub position: String,
    pub attendance_rate: u32,
    pub days_worked: u32,
    pub total_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAttendance {
    pub day: String,
    pub attendance_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctualityCategory {
    Present,
    Late,
    Absent,
}

impl PunctualityCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PunctualityCategory::Present => "A tiempo",
            PunctualityCategory::Late => "Retardo",
            PunctualityCategory::Absent => "Falta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunctualityShare {
    pub category: PunctualityCategory,
    pub name: String,
    pub count: u32,
}
