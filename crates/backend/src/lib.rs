//! Reporting backend: aggregates orders, clients, staff and attendance into
//! dashboard figures and paginated PDF reports.

pub mod api;
pub mod dashboards;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;
