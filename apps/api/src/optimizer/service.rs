//! The four optimizer operations.
//!
//! Every operation returns a discriminated result instead of `Err`: fetch,
//! encoding and provider failures all become `Failure { error }` with a
//! human-readable message.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{info, warn};

use crate::llm_client::{strip_code_fences, GenerativeModel, Part};
use crate::models::resume::TemplateVariables;
use crate::optimizer::extract::{extract_suggestions, extract_variables};
use crate::optimizer::input::{DocumentFetcher, ResumeInput};
use crate::optimizer::prompts::{
    job_position_prompt, OPTIMIZE_PROMPT, SUMMARY_PROMPT, TEMPLATE_PROMPT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizationResult {
    Success {
        optimized_content: String,
        suggestions: Vec<String>,
    },
    Failure {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateResult {
    Success {
        template_content: String,
        variables: TemplateVariables,
    },
    Failure {
        error: String,
    },
}

// Wire form: `{success, optimizedContent, suggestions}` | `{success: false, error}`.
impl Serialize for OptimizationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptimizationResult::Success {
                optimized_content,
                suggestions,
            } => {
                let mut s = serializer.serialize_struct("OptimizationResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("optimizedContent", optimized_content)?;
                s.serialize_field("suggestions", suggestions)?;
                s.end()
            }
            OptimizationResult::Failure { error } => {
                failure(serializer, "OptimizationResult", error)
            }
        }
    }
}

// Wire form: `{success, templateContent, variables}` | `{success: false, error}`.
impl Serialize for TemplateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TemplateResult::Success {
                template_content,
                variables,
            } => {
                let mut s = serializer.serialize_struct("TemplateResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("templateContent", template_content)?;
                s.serialize_field("variables", variables)?;
                s.end()
            }
            TemplateResult::Failure { error } => failure(serializer, "TemplateResult", error),
        }
    }
}

fn failure<S: Serializer>(
    serializer: S,
    name: &'static str,
    error: &str,
) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct(name, 2)?;
    s.serialize_field("success", &false)?;
    s.serialize_field("error", error)?;
    s.end()
}

#[derive(Clone)]
pub struct OptimizerService {
    model: Arc<dyn GenerativeModel>,
    fetcher: Arc<dyn DocumentFetcher>,
}

impl OptimizerService {
    pub fn new(model: Arc<dyn GenerativeModel>, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { model, fetcher }
    }

    /// General optimization advice; a blank `custom_prompt` means the default.
    pub async fn optimize_resume(
        &self,
        input: ResumeInput,
        custom_prompt: Option<&str>,
    ) -> OptimizationResult {
        let prompt = choose_prompt(custom_prompt, OPTIMIZE_PROMPT);
        self.optimize("optimize_resume", prompt, input).await
    }

    pub async fn optimize_for_job_position(
        &self,
        input: ResumeInput,
        job_description: &str,
    ) -> OptimizationResult {
        let prompt = job_position_prompt(job_description);
        self.optimize("optimize_for_job_position", &prompt, input).await
    }

    pub async fn generate_resume_summary(&self, input: ResumeInput) -> OptimizationResult {
        self.optimize("generate_resume_summary", SUMMARY_PROMPT, input)
            .await
    }

    /// Asks for the fixed-format template and pulls out any variables the
    /// model left next to their placeholders.
    pub async fn generate_resume_template(
        &self,
        input: ResumeInput,
        custom_prompt: Option<&str>,
    ) -> TemplateResult {
        let prompt = choose_prompt(custom_prompt, TEMPLATE_PROMPT);
        match self.generate("generate_resume_template", prompt, input).await {
            Ok(text) => {
                let template_content = strip_code_fences(&text).to_string();
                let variables = extract_variables(&template_content);
                TemplateResult::Success {
                    template_content,
                    variables,
                }
            }
            Err(error) => TemplateResult::Failure { error },
        }
    }

    async fn optimize(
        &self,
        operation: &'static str,
        prompt: &str,
        input: ResumeInput,
    ) -> OptimizationResult {
        match self.generate(operation, prompt, input).await {
            Ok(optimized_content) => {
                let suggestions = extract_suggestions(&optimized_content);
                OptimizationResult::Success {
                    optimized_content,
                    suggestions,
                }
            }
            Err(error) => OptimizationResult::Failure { error },
        }
    }

    /// Prompt first, then the résumé part. Errors come back as display text.
    async fn generate(
        &self,
        operation: &'static str,
        prompt: &str,
        input: ResumeInput,
    ) -> Result<String, String> {
        info!(operation, input = input.kind(), "Optimizer request");

        let resume_part = input.into_part(self.fetcher.as_ref()).await.map_err(|e| {
            warn!(operation, "Résumé input rejected: {e}");
            e.to_string()
        })?;

        let parts = [Part::text(prompt), resume_part];
        let text = self.model.generate(&parts).await.map_err(|e| {
            warn!(operation, "Model call failed: {e}");
            format!("AI 处理失败: {e}")
        })?;

        info!(operation, chars = text.chars().count(), "Optimizer response received");
        Ok(text)
    }
}

fn choose_prompt<'a>(custom: Option<&'a str>, default: &'a str) -> &'a str {
    custom.filter(|p| !p.trim().is_empty()).unwrap_or(default)
}
