pub mod aggregate;

pub use aggregate::{Loan, LoanStatus, Staff, StaffId};
