use axum::http::{header, Method};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{handlers, AppState};

/// Build the application router over `state`
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let files = ServeDir::new(&state.settings.storage_dir);
    let public_prefix = state.settings.public_prefix.clone();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // DASHBOARDS (d400-d403)
        // ========================================
        .route(
            "/api/d400/summary",
            get(handlers::d400_summary_report::get_summary_report),
        )
        .route(
            "/api/d401/orders",
            get(handlers::d401_orders_report::get_orders_report),
        )
        .route(
            "/api/d402/clients",
            get(handlers::d402_clients_report::get_clients_report),
        )
        .route(
            "/api/d403/attendance",
            get(handlers::d403_attendance_report::get_attendance_report),
        )
        // ========================================
        // USECASES
        // ========================================
        .route(
            "/api/u400/generate",
            post(handlers::usecases::u400_generate_report),
        )
        // ========================================
        // STORED REPORTS
        // ========================================
        .route(
            "/api/reports/artifacts",
            get(handlers::a006_report_artifact::list),
        )
        .route(
            "/api/reports/artifacts/:id",
            delete(handlers::a006_report_artifact::delete),
        )
        .route(
            "/api/reports/artifacts/:id/download",
            get(handlers::a006_report_artifact::download),
        )
        .nest_service(&public_prefix, files)
        .layer(cors)
        .with_state(state)
}
