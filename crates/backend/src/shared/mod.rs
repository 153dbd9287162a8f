pub mod artifacts;
pub mod cancel;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod period;
pub mod rates;
pub mod report_pdf;
