use std::sync::Arc;

use crate::config::Config;
use crate::export::PdfExporter;
use crate::optimizer::OptimizerService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gemini-backed optimizer. Swappable through its `GenerativeModel` seam.
    pub optimizer: OptimizerService,
    /// One exporter for the process so its capture semaphore is shared.
    pub exporter: Arc<PdfExporter>,
}
