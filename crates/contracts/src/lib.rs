//! Plain data shared between the reporting backend and the dashboard UI.
//!
//! Nothing in this crate talks to a database or to the file system: entities,
//! report requests, aggregator outputs and document sections are all inert
//! values that serialize to the JSON the UI consumes.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod usecases;
