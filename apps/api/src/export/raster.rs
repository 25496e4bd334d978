//! Snapshot-to-Image Converter.
//!
//! An export renders its standalone document inside a `RenderSurface`: a
//! private temporary directory holding the document, the browser profile and
//! the screenshot. Nothing of the host process leaks in, and dropping the
//! surface removes all of it.
//!
//! `Rasterizer` is the seam. `ChromeRasterizer` drives a headless Chromium;
//! tests substitute an in-memory implementation.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

const DOCUMENT_FILE: &str = "index.html";
const SCREENSHOT_FILE: &str = "capture.png";
const PROFILE_DIR: &str = "profile";

/// White page background; rows of only this colour below the content are trimmed.
pub const BACKGROUND: [u8; 3] = [0xff, 0xff, 0xff];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to prepare render surface: {0}")]
    Surface(#[source] std::io::Error),

    #[error("failed to launch browser '{binary}': {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser exited with {status}: {stderr}")]
    Browser { status: String, stderr: String },

    #[error("capture timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser produced no capture at {0}")]
    MissingCapture(PathBuf),

    #[error("failed to decode capture: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid raster image: {0}")]
    InvalidImage(String),

    #[error("capture task failed: {0}")]
    Task(String),

    #[error("document exceeds the {max_height_px}px capture height (EXPORT_MAX_HEIGHT_PX)")]
    Overflow { max_height_px: u32 },
}

/// An RGB8 bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidImage(format!(
                "image has zero extent ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(RenderError::InvalidImage(format!(
                "expected {expected} bytes for {width}x{height} RGB, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A solid-colour image.
    #[cfg(test)]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, RenderError> {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Decodes PNG/JPEG bytes, dropping any alpha channel.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::new(width, height, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the last row holds anything but `background`.
    pub fn bottom_row_has_content(&self, background: [u8; 3]) -> bool {
        let row_len = self.width as usize * 3;
        self.pixels
            .chunks_exact(row_len)
            .last()
            .is_some_and(|row| row.chunks_exact(3).any(|px| px != background))
    }

    /// Crops rows of pure `background` off the bottom, keeping `padding` rows
    /// below the last content row. An all-background image keeps one row.
    pub fn trim_trailing_background(&mut self, background: [u8; 3], padding: u32) {
        let row_len = self.width as usize * 3;
        let last_content = self
            .pixels
            .chunks_exact(row_len)
            .rposition(|row| row.chunks_exact(3).any(|px| px != background));

        let keep = match last_content {
            Some(row) => (row as u32 + 1 + padding).min(self.height),
            None => 1,
        };
        if keep < self.height {
            self.pixels.truncate(keep as usize * row_len);
            self.height = keep;
        }
    }
}

/// Capture parameters for one rasterization.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Viewport width in CSS pixels.
    pub width_px: u32,
    /// Viewport height in CSS pixels; taller documents fail with `Overflow`.
    pub max_height_px: u32,
    /// Device scale factor (quality multiplier).
    pub scale: f32,
    /// Layout settle budget before the capture is taken.
    pub settle: Duration,
    pub timeout: Duration,
}

/// Isolated on-disk surface for one export.
#[derive(Debug)]
pub struct RenderSurface {
    dir: TempDir,
}

impl RenderSurface {
    /// Creates a fresh surface holding `document`.
    pub fn create(document: &str) -> Result<Self, RenderError> {
        let dir = tempfile::Builder::new()
            .prefix("resume-surface-")
            .tempdir()
            .map_err(RenderError::Surface)?;
        std::fs::write(dir.path().join(DOCUMENT_FILE), document).map_err(RenderError::Surface)?;
        Ok(Self { dir })
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join(DOCUMENT_FILE)
    }

    pub fn document_url(&self) -> String {
        format!("file://{}", self.document_path().display())
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.dir.path().join(SCREENSHOT_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.dir.path().join(PROFILE_DIR)
    }

    /// Removes the surface from disk. Dropping does the same, silently.
    pub fn teardown(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("failed to remove render surface {}: {e}", path.display());
        } else {
            debug!("render surface {} removed", path.display());
        }
    }
}

/// Turns a loaded surface into a bitmap.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(
        &self,
        surface: &RenderSurface,
        options: &CaptureOptions,
    ) -> Result<RasterImage, RenderError>;
}

/// Headless Chromium screenshotter.
pub struct ChromeRasterizer {
    binary: String,
    no_sandbox: bool,
}

impl ChromeRasterizer {
    pub fn new(binary: impl Into<String>, no_sandbox: bool) -> Self {
        Self {
            binary: binary.into(),
            no_sandbox,
        }
    }

    fn command(&self, surface: &RenderSurface, options: &CaptureOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--no-first-run")
            .arg("--mute-audio")
            // Remote images must not fail the whole capture.
            .arg("--disable-web-security")
            .arg("--allow-file-access-from-files")
            .arg("--allow-running-insecure-content")
            .arg(format!("--user-data-dir={}", surface.profile_path().display()))
            .arg(format!(
                "--window-size={},{}",
                options.width_px, options.max_height_px
            ))
            .arg(format!("--force-device-scale-factor={}", options.scale))
            .arg(format!(
                "--virtual-time-budget={}",
                options.settle.as_millis()
            ))
            .arg(format!("--screenshot={}", surface.screenshot_path().display()));
        if self.no_sandbox {
            cmd.arg("--no-sandbox");
        }
        cmd.arg(surface.document_url())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Rasterizer for ChromeRasterizer {
    async fn rasterize(
        &self,
        surface: &RenderSurface,
        options: &CaptureOptions,
    ) -> Result<RasterImage, RenderError> {
        let mut cmd = self.command(surface, options);
        debug!("launching {} for {}", self.binary, surface.document_url());

        let output = tokio::time::timeout(options.timeout, cmd.output())
            .await
            .map_err(|_| RenderError::Timeout(options.timeout))?
            .map_err(|source| RenderError::Launch {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Browser {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let screenshot = surface.screenshot_path();
        let bytes = match tokio::fs::read(&screenshot).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingCapture(screenshot))
            }
            Err(e) => return Err(RenderError::Surface(e)),
        };

        // PNG decode of a multi-megapixel capture is CPU-bound.
        let padding = (options.scale * 40.0).round() as u32;
        let max_height_px = options.max_height_px;
        tokio::task::spawn_blocking(move || finish_capture(&bytes, padding, max_height_px))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}

/// Decodes a screenshot and trims the blank space under the content. Content
/// touching the bottom edge was cut off by the viewport, so it is an error.
fn finish_capture(
    bytes: &[u8],
    padding: u32,
    max_height_px: u32,
) -> Result<RasterImage, RenderError> {
    let mut image = RasterImage::decode(bytes)?;
    if image.bottom_row_has_content(BACKGROUND) {
        warn!(
            height = image.height(),
            max_height_px, "capture reached the bottom of the viewport"
        );
        return Err(RenderError::Overflow { max_height_px });
    }
    image.trim_trailing_background(BACKGROUND, padding);
    Ok(image)
}
