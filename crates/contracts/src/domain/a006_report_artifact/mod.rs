pub mod aggregate;

pub use aggregate::{ReportArtifact, ReportPeriodTag};
