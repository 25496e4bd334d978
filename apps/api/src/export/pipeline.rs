//! Export pipeline: template → `ResumeData` → HTML → bitmap → paginated PDF.
//!
//! Stages: Idle → Rendering → Captured → Paginating → Saved | Failed.
//! Each export gets its own `RenderSurface`, torn down before the call
//! returns on every path. Captures are gated by a semaphore, so with the
//! default concurrency of 1 exports run one at a time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::export::pdf::{assemble, layout, PdfError};
use crate::export::raster::{CaptureOptions, RasterImage, Rasterizer, RenderError, RenderSurface};
use crate::models::resume::ResumeData;
use crate::render::{render_document, PAGE_WIDTH_PX};
use crate::template::parse_template;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStage {
    Idle,
    Rendering,
    Captured,
    Paginating,
    Saved,
    Failed,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Idle => "idle",
            ExportStage::Rendering => "rendering",
            ExportStage::Captured => "captured",
            ExportStage::Paginating => "paginating",
            ExportStage::Saved => "saved",
            ExportStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF export failed while {stage}: {source}")]
    Render {
        stage: ExportStage,
        #[source]
        source: RenderError,
    },

    #[error("PDF export failed while paginating: {0}")]
    Pdf(#[from] PdfError),

    #[error("PDF export failed: {0}")]
    Task(String),
}

/// A finished PDF, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    /// Always ends in `.pdf`.
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct PdfExporter {
    rasterizer: Arc<dyn Rasterizer>,
    config: ExportConfig,
    captures: Semaphore,
}

impl PdfExporter {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, config: ExportConfig) -> Self {
        let permits = config.concurrency.max(1);
        Self {
            rasterizer,
            config,
            captures: Semaphore::new(permits),
        }
    }

    /// Parses `template` and exports the result.
    pub async fn export_template(
        &self,
        template: &str,
        filename: Option<&str>,
    ) -> Result<PdfArtifact, ExportError> {
        let parsed = parse_template(template);
        self.export_data(&parsed.data, filename).await
    }

    /// Renders `data` and exports it as `<filename>.pdf`.
    pub async fn export_data(
        &self,
        data: &ResumeData,
        filename: Option<&str>,
    ) -> Result<PdfArtifact, ExportError> {
        let export_id = Uuid::new_v4();
        let filename = pdf_filename(filename.unwrap_or(self.config.filename.as_str()));
        info!(%export_id, %filename, stage = %ExportStage::Idle, "PDF export requested");
        if data.is_empty() {
            warn!(
                %export_id,
                "exporting a résumé with no content; only the header band will render"
            );
        }

        match self.run(export_id, data, filename).await {
            Ok(artifact) => {
                info!(
                    %export_id,
                    stage = %ExportStage::Saved,
                    pages = artifact.page_count,
                    bytes = artifact.bytes.len(),
                    "PDF export finished"
                );
                Ok(artifact)
            }
            Err(e) => {
                error!(%export_id, stage = %ExportStage::Failed, "{e}");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        export_id: Uuid,
        data: &ResumeData,
        filename: String,
    ) -> Result<PdfArtifact, ExportError> {
        let image = self.capture(export_id, data).await?;

        info!(
            %export_id,
            stage = %ExportStage::Paginating,
            "{}x{}px",
            image.width(),
            image.height()
        );
        let page = self.config.paper.page_size(self.config.orientation);
        let plan = layout(image.width(), image.height(), page)?;
        let page_count = plan.placements.len();

        // Copying the bitmap into the PDF is CPU-bound.
        let bytes = tokio::task::spawn_blocking(move || assemble(&image, &plan))
            .await
            .map_err(|e| ExportError::Task(format!("PDF assembly task failed: {e}")))??;

        Ok(PdfArtifact {
            filename,
            bytes,
            page_count,
        })
    }

    /// Rendering → Captured. The surface never outlives this call.
    async fn capture(
        &self,
        export_id: Uuid,
        data: &ResumeData,
    ) -> Result<RasterImage, ExportError> {
        let _permit = self
            .captures
            .acquire()
            .await
            .map_err(|e| ExportError::Task(format!("capture gate closed: {e}")))?;

        info!(%export_id, stage = %ExportStage::Rendering, "creating render surface");
        let surface = RenderSurface::create(&render_document(data)).map_err(|source| {
            ExportError::Render {
                stage: ExportStage::Rendering,
                source,
            }
        })?;

        let result = self.rasterizer.rasterize(&surface, &self.capture_options()).await;
        surface.teardown();

        let image = result.map_err(|source| ExportError::Render {
            stage: ExportStage::Rendering,
            source,
        })?;
        info!(%export_id, stage = %ExportStage::Captured, "surface rasterized");
        Ok(image)
    }

    fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            width_px: PAGE_WIDTH_PX,
            max_height_px: self.config.max_height_px,
            scale: self.config.quality,
            settle: self.config.settle,
            timeout: self.config.capture_timeout,
        }
    }
}

/// `name` → `name.pdf`, with path separators and control characters removed.
/// Blank names fall back to `resume.pdf`.
pub fn pdf_filename(name: &str) -> String {
    let stem: String = name
        .trim()
        .trim_end_matches(".pdf")
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '"'))
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Default settle budget for callers building an `ExportConfig` by hand.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);
