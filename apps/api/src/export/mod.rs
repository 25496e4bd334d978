// PDF export: isolated render surface → bitmap → paginated PDF.

pub mod handlers;
pub mod paper;
pub mod pdf;
pub mod pipeline;
pub mod raster;

pub use pipeline::{ExportError, PdfExporter};
pub use raster::ChromeRasterizer;
