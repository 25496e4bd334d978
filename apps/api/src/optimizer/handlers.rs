//! Axum route handlers for the Optimizer API.
//!
//! Malformed requests are rejected with 400. Everything past validation
//! answers 200 with a `{success, …}` body, including provider failures.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::optimizer::{OptimizationResult, ResumeInput, TemplateResult, UploadedFile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Résumé text or an `http(s)://` document URL.
    pub input: String,
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPositionRequest {
    pub input: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub input: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    let input = classify_input(&request.input)?;
    let result = state
        .optimizer
        .optimize_resume(input, request.custom_prompt.as_deref())
        .await;
    Ok(Json(result))
}

/// POST /api/v1/optimize/upload
///
/// Multipart: `file` (required), `customPrompt` (optional).
pub async fn handle_optimize_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizationResult>, AppError> {
    let upload = read_upload(multipart).await?;
    let result = state
        .optimizer
        .optimize_resume(ResumeInput::File(upload.file), upload.custom_prompt.as_deref())
        .await;
    Ok(Json(result))
}

/// POST /api/v1/optimize/job
pub async fn handle_optimize_job(
    State(state): State<AppState>,
    Json(request): Json<JobPositionRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    let input = classify_input(&request.input)?;
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }
    let result = state
        .optimizer
        .optimize_for_job_position(input, &request.job_description)
        .await;
    Ok(Json(result))
}

/// POST /api/v1/optimize/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    let input = classify_input(&request.input)?;
    Ok(Json(state.optimizer.generate_resume_summary(input).await))
}

/// POST /api/v1/template
///
/// Fills the fixed-format template from the résumé.
pub async fn handle_template(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<TemplateResult>, AppError> {
    let input = classify_input(&request.input)?;
    let result = state
        .optimizer
        .generate_resume_template(input, request.custom_prompt.as_deref())
        .await;
    Ok(Json(result))
}

/// POST /api/v1/template/upload
pub async fn handle_template_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TemplateResult>, AppError> {
    let upload = read_upload(multipart).await?;
    let result = state
        .optimizer
        .generate_resume_template(ResumeInput::File(upload.file), upload.custom_prompt.as_deref())
        .await;
    Ok(Json(result))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn classify_input(input: &str) -> Result<ResumeInput, AppError> {
    if input.trim().is_empty() {
        return Err(AppError::Validation("input cannot be empty".to_string()));
    }
    Ok(ResumeInput::classify(input))
}

struct Upload {
    file: UploadedFile,
    custom_prompt: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file = None;
    let mut custom_prompt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read file: {e}")))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("customPrompt") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("could not read customPrompt: {e}"))
                })?;
                custom_prompt = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| {
        AppError::Validation("multipart field 'file' is required".to_string())
    })?;
    Ok(Upload {
        file,
        custom_prompt,
    })
}
