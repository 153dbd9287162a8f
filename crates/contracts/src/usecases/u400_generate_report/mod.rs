pub mod response;

pub use response::GenerateReportResponse;
