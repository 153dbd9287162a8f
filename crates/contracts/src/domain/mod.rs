pub mod a001_order;
pub mod a002_client;
pub mod a003_staff;
pub mod a004_attendance;
pub mod a005_payment;
pub mod a006_report_artifact;
pub mod common;
