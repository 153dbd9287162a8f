pub mod d400_summary_report;
pub mod d401_orders_report;
pub mod d402_clients_report;
pub mod d403_attendance_report;
