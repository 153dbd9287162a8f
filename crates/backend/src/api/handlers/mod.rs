// Dashboard handlers (d400-d403)
pub mod d400_summary_report;
pub mod d401_orders_report;
pub mod d402_clients_report;
pub mod d403_attendance_report;

// Stored report documents
pub mod a006_report_artifact;

// UseCase handlers
pub mod usecases;
