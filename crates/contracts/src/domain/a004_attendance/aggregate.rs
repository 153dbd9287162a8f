use crate::aggregate_id;
use crate::domain::a003_staff::StaffId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

aggregate_id!(
    /// Attendance record identifier
    AttendanceId
);

/// One check-in (and optional check-out) of a staff member.
///
/// A staff member has at most one open record per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub staff_id: StaffId,
    pub staff_name: Option<String>,
    /// Calendar date the record belongs to; kept separately from `check_in`
    /// so date-only queries stay cheap
    pub date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
}

impl Attendance {
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }
}
