use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::export::paper::{Orientation, PaperFormat};
use crate::export::pipeline::DEFAULT_SETTLE;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Startup fails if `GEMINI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub export: ExportConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Everything the AI client needs. Passed in at construction.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Tried once the primary model has exhausted its retries.
    pub fallback_model: Option<String>,
    pub api_base: String,
    pub max_retries: u32,
    /// Applied to every outbound request (provider and URL downloads).
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("fallback_model", &self.fallback_model)
            .field("api_base", &self.api_base)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub chrome_bin: String,
    pub chrome_no_sandbox: bool,
    /// Device scale factor for captures.
    pub quality: f32,
    pub settle: Duration,
    /// Tallest document that can be captured, in CSS pixels.
    pub max_height_px: u32,
    pub capture_timeout: Duration,
    pub paper: PaperFormat,
    pub orientation: Orientation,
    /// Download name used when a request gives none.
    pub filename: String,
    /// Captures allowed to run at once.
    pub concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini: GeminiConfig {
                api_key: require_env("GEMINI_API_KEY")?,
                model: env_or("GEMINI_MODEL", "gemini-2.5-pro"),
                fallback_model: optional_env("GEMINI_FALLBACK_MODEL")
                    .or_else(|| Some("gemini-2.5-flash".to_string()))
                    .filter(|m| !m.eq_ignore_ascii_case("none")),
                api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
                max_retries: parse_env("GEMINI_MAX_RETRIES", 3)?,
                timeout: Duration::from_millis(parse_env("GEMINI_TIMEOUT_MS", 30_000)?),
            },
            export: ExportConfig {
                chrome_bin: env_or("CHROME_BIN", "chromium"),
                chrome_no_sandbox: parse_env("CHROME_NO_SANDBOX", false)?,
                quality: parse_env("EXPORT_QUALITY", 2.0)?,
                settle: Duration::from_millis(parse_env(
                    "EXPORT_SETTLE_MS",
                    DEFAULT_SETTLE.as_millis() as u64,
                )?),
                max_height_px: parse_env("EXPORT_MAX_HEIGHT_PX", 6000)?,
                capture_timeout: Duration::from_millis(parse_env("EXPORT_TIMEOUT_MS", 60_000)?),
                paper: parse_env("EXPORT_PAPER", PaperFormat::A4)?,
                orientation: parse_env("EXPORT_ORIENTATION", Orientation::Portrait)?,
                filename: env_or("EXPORT_FILENAME", "resume"),
                concurrency: parse_env("EXPORT_CONCURRENCY", 1)?,
            },
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
