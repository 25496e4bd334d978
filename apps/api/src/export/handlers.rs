//! Axum route handlers for template parsing and export.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::render::render_document;
use crate::state::AppState;
use crate::template::{parse_template, write_template, ParsedTemplate};

const PAGE_COUNT_HEADER: &str = "x-page-count";

/// RFC 5987 `attr-char`; everything else is percent-encoded in `filename*`.
const ATTR_CHARS: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseTemplateRequest {
    pub template: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteTemplateRequest {
    pub data: ResumeData,
}

/// Either template text or already-structured data. Template wins when both
/// are present.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub template: Option<String>,
    pub data: Option<ResumeData>,
    pub filename: Option<String>,
}

impl ExportRequest {
    fn into_data(self) -> Result<ResumeData, AppError> {
        match (self.template, self.data) {
            (Some(template), _) if !template.trim().is_empty() => {
                Ok(parse_template(&template).data)
            }
            (_, Some(data)) => Ok(data),
            _ => Err(AppError::Validation(
                "either template or data is required".to_string(),
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/template/parse
///
/// Returns the structured record plus whatever the parser could not place.
pub async fn handle_parse_template(
    Json(request): Json<ParseTemplateRequest>,
) -> Result<Json<ParsedTemplate>, AppError> {
    if request.template.trim().is_empty() {
        return Err(AppError::Validation("template cannot be empty".to_string()));
    }
    Ok(Json(parse_template(&request.template)))
}

/// POST /api/v1/template/write
///
/// Structured record → template text the parser reads back.
pub async fn handle_write_template(Json(request): Json<WriteTemplateRequest>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        write_template(&request.data),
    )
        .into_response()
}

/// POST /api/v1/export/html
pub async fn handle_export_html(
    Json(request): Json<ExportRequest>,
) -> Result<Html<String>, AppError> {
    let data = request.into_data()?;
    Ok(Html(render_document(&data)))
}

/// POST /api/v1/export/pdf
///
/// Responds with the PDF as an attachment named `<filename>.pdf`.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(mut request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let filename = request.filename.take();
    let artifact = match request.template.take().filter(|t| !t.trim().is_empty()) {
        Some(template) => {
            state
                .exporter
                .export_template(&template, filename.as_deref())
                .await?
        }
        None => {
            let data = request.into_data()?;
            state.exporter.export_data(&data, filename.as_deref()).await?
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.filename),
            ),
            (
                header::HeaderName::from_static(PAGE_COUNT_HEADER),
                artifact.page_count.to_string(),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// `attachment` with a quoted ASCII `filename`. Non-ASCII names get an
/// underscored fallback plus the exact name in `filename*` (RFC 6266).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if fallback == filename {
        return format!("attachment; filename=\"{filename}\"");
    }
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(filename, ATTR_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_filename_is_quoted() {
        assert_eq!(
            content_disposition("zhangsan.pdf"),
            "attachment; filename=\"zhangsan.pdf\""
        );
    }

    #[test]
    fn test_non_ascii_filename_gets_encoded_form() {
        assert_eq!(
            content_disposition("简历 v2.pdf"),
            "attachment; filename=\"__ v2.pdf\"; filename*=UTF-8''%E7%AE%80%E5%8E%86%20v2.pdf"
        );
    }

    #[test]
    fn test_template_wins_over_data() {
        let request = ExportRequest {
            template: Some("## 个人信息\n姓名：张三".to_string()),
            data: Some(ResumeData::default()),
            filename: None,
        };
        assert_eq!(request.into_data().unwrap().name.as_deref(), Some("张三"));
    }
}
