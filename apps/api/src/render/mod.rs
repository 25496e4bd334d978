// Résumé HTML rendering: per-section formatters and the two-column layout.

pub mod format;
pub mod html;

pub use html::{render_document, PAGE_WIDTH_PX};
