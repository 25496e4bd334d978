// Résumé optimization: classify the input, build the Gemini request parts,
// call the model and shape the answer into a discriminated result.
// All provider calls go through llm_client; nothing here talks HTTP to Gemini.

pub mod extract;
pub mod handlers;
pub mod input;
pub mod prompts;
pub mod service;

pub use input::{HttpFetcher, ResumeInput, UploadedFile};
pub use service::{OptimizationResult, OptimizerService, TemplateResult};
