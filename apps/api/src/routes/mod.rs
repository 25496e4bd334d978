pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::optimizer::handlers as optimizer;
use crate::state::AppState;

/// Résumé uploads are PDFs or images; allow more than axum's 2 MB default.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Optimizer API
        .route("/api/v1/optimize", post(optimizer::handle_optimize))
        .route(
            "/api/v1/optimize/upload",
            post(optimizer::handle_optimize_upload),
        )
        .route("/api/v1/optimize/job", post(optimizer::handle_optimize_job))
        .route("/api/v1/optimize/summary", post(optimizer::handle_summary))
        .route("/api/v1/template", post(optimizer::handle_template))
        .route(
            "/api/v1/template/upload",
            post(optimizer::handle_template_upload),
        )
        // Template + export API
        .route("/api/v1/template/parse", post(export::handle_parse_template))
        .route("/api/v1/template/write", post(export::handle_write_template))
        .route("/api/v1/export/html", post(export::handle_export_html))
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
