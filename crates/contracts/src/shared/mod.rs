pub mod locale;
pub mod period;
pub mod report_document;
