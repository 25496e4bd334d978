//! Résumé input: literal text, a remote document URL, or an uploaded file.
//! Each becomes the second request part after the prompt.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::Part;
use crate::optimizer::prompts::RESUME_TEXT_PREFIX;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("URL 文件获取失败: HTTP error! status: {status}")]
    Fetch { status: u16 },

    #[error("URL 文件获取失败: {0}")]
    Network(#[from] reqwest::Error),

    #[error("文件处理失败: {0}")]
    Encoding(String),
}

/// A file received through a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A downloaded document: raw bytes plus the server's media type.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub enum ResumeInput {
    Text(String),
    Url(String),
    File(UploadedFile),
}

impl ResumeInput {
    /// An input starting with `http://` or `https://` is a URL; anything else,
    /// including text with leading whitespace, is résumé text.
    pub fn classify(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            ResumeInput::Url(input.to_string())
        } else {
            ResumeInput::Text(input.to_string())
        }
    }

    /// Short description for logs; never includes the résumé text itself.
    pub fn kind(&self) -> &'static str {
        match self {
            ResumeInput::Text(_) => "text",
            ResumeInput::Url(_) => "url",
            ResumeInput::File(_) => "file",
        }
    }

    /// Turns the input into the résumé request part, downloading URLs first.
    pub async fn into_part(self, fetcher: &dyn DocumentFetcher) -> Result<Part, InputError> {
        match self {
            ResumeInput::Text(text) => Ok(Part::text(format!("{RESUME_TEXT_PREFIX}{text}"))),
            ResumeInput::Url(url) => {
                let document = fetcher.fetch(&url).await?;
                debug!(
                    "Fetched {} bytes ({}) from {}",
                    document.bytes.len(),
                    document.mime_type,
                    url
                );
                inline_part(&document.bytes, &document.mime_type)
            }
            ResumeInput::File(file) => {
                debug!(
                    "Encoding upload {} ({} bytes)",
                    file.file_name.as_deref().unwrap_or("<unnamed>"),
                    file.bytes.len()
                );
                let mime_type = file
                    .content_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(DEFAULT_MIME_TYPE);
                inline_part(&file.bytes, mime_type)
            }
        }
    }
}

fn inline_part(bytes: &[u8], mime_type: &str) -> Result<Part, InputError> {
    if bytes.is_empty() {
        return Err(InputError::Encoding("文件内容为空".to_string()));
    }
    Ok(Part::inline(mime_type, STANDARD.encode(bytes)))
}

/// Downloads remote résumé documents.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, InputError>;
}

/// `reqwest`-backed fetcher sharing the provider's request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: std::time::Duration) -> Result<Self, InputError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, InputError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InputError::Fetch {
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        Ok(FetchedDocument { mime_type, bytes })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        http::{header, StatusCode},
        routing::get,
        Router,
    };

    use super::*;

    async fn spawn_server() -> String {
        let app = Router::new()
            .route(
                "/resume.pdf",
                get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "%PDF-1.4 fake") }),
            )
            .route("/raw", get(|| async { b"raw bytes".to_vec() }))
            .route(
                "/missing.pdf",
                get(|| async { (StatusCode::NOT_FOUND, "gone") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_classify_url_and_text() {
        assert!(matches!(
            ResumeInput::classify("https://x.com/a.pdf"),
            ResumeInput::Url(u) if u == "https://x.com/a.pdf"
        ));
        assert!(matches!(
            ResumeInput::classify("http://example.com/cv"),
            ResumeInput::Url(_)
        ));
        assert!(matches!(
            ResumeInput::classify("some resume text"),
            ResumeInput::Text(t) if t == "some resume text"
        ));
        // Only a scheme at the very start counts.
        assert!(matches!(
            ResumeInput::classify("主页 https://x.com"),
            ResumeInput::Text(_)
        ));
        assert!(matches!(
            ResumeInput::classify(" https://x.com/a.pdf"),
            ResumeInput::Text(t) if t == " https://x.com/a.pdf"
        ));
    }

    #[tokio::test]
    async fn test_text_becomes_prefixed_instruction() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let part = ResumeInput::classify("张三 五年后端经验")
            .into_part(&fetcher)
            .await
            .unwrap();
        assert_eq!(part, Part::text("以下是简历内容：\n张三 五年后端经验"));
    }

    #[tokio::test]
    async fn test_uploaded_file_is_base64_inline() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let file = UploadedFile {
            file_name: Some("cv.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"ABC"),
        };
        let part = ResumeInput::File(file).into_part(&fetcher).await.unwrap();
        assert_eq!(part, Part::inline("application/pdf", "QUJD"));
    }

    #[tokio::test]
    async fn test_empty_upload_is_encoding_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let file = UploadedFile {
            file_name: None,
            content_type: None,
            bytes: Bytes::new(),
        };
        let err = ResumeInput::File(file).into_part(&fetcher).await.unwrap_err();
        assert!(matches!(err, InputError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_url_uses_response_content_type() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let part = ResumeInput::classify(&format!("{base}/resume.pdf"))
            .into_part(&fetcher)
            .await
            .unwrap();
        assert_eq!(
            part,
            Part::inline("application/pdf", STANDARD.encode("%PDF-1.4 fake"))
        );
    }

    #[tokio::test]
    async fn test_url_without_content_type_defaults_to_octet_stream() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let document = fetcher.fetch(&format!("{base}/raw")).await.unwrap();
        // axum labels Vec<u8> bodies as octet-stream as well.
        assert_eq!(document.mime_type, "application/octet-stream");
        assert_eq!(&document.bytes[..], b"raw bytes");
    }

    #[tokio::test]
    async fn test_fetch_404_reports_status() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&format!("{base}/missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::Fetch { status: 404 }));
        assert!(err.to_string().contains("404"));
    }
}
