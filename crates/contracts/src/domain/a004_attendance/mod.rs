pub mod aggregate;

pub use aggregate::{Attendance, AttendanceId};
