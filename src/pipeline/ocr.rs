//! OCR engine seam and the Tesseract command-line backend.
//!
//! The engine is a black box: it receives one binarised image and a language
//! tag and returns whatever text it recognised, uncleaned. Cleaning and the
//! empty-result check happen in the caller so every engine gets the same
//! treatment.

use crate::error::OcrError;
use crate::pipeline::preprocess::PreprocessedImage;
use async_trait::async_trait;
use image::{GrayImage, ImageFormat};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Something that turns pixels into text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short name used in error messages and logs.
    fn name(&self) -> &str;

    /// Recognise text in `image` using the given language tag.
    async fn recognize(&self, image: &PreprocessedImage, language: &str)
        -> Result<String, OcrError>;
}

/// OCR engine wrapping the `tesseract` CLI tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    cmd: PathBuf,
}

impl TesseractEngine {
    pub fn new(cmd: impl Into<PathBuf>) -> Self {
        Self { cmd: cmd.into() }
    }

    fn engine_error(&self, message: impl Into<String>) -> OcrError {
        OcrError::OcrEngineError {
            engine: self.name().to_string(),
            message: message.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(level = "debug", skip_all, fields(w = image.width(), h = image.height()))]
    async fn recognize(
        &self,
        image: &PreprocessedImage,
        language: &str,
    ) -> Result<String, OcrError> {
        // PNG encoding blocks. The scratch directory lives until the end of
        // this call, whichever way it returns.
        let pixels = image.image.clone();
        let (tmpdir, input_path) = tokio::task::spawn_blocking(move || write_scratch_png(&pixels))
            .await
            .map_err(|e| self.engine_error(format!("scratch writer panicked: {e}")))?
            .map_err(|e| self.engine_error(e))?;

        let output = Command::new(&self.cmd)
            .arg(&input_path)
            .arg("stdout")
            .args(["-l", language])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.engine_error(format!(
                        "{} not found (install tesseract-ocr)",
                        self.cmd.display()
                    ))
                } else {
                    self.engine_error(format!("cannot run {}: {e}", self.cmd.display()))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.engine_error(format!(
                "tesseract failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        drop(tmpdir);
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract returned {} bytes", text.len());
        Ok(text)
    }
}

/// Save `image` as `page.png` inside a fresh scratch directory.
fn write_scratch_png(image: &GrayImage) -> Result<(TempDir, PathBuf), String> {
    let tmpdir = TempDir::with_prefix("img2txt-")
        .map_err(|e| format!("cannot create temp dir: {e}"))?;
    let input_path = tmpdir.path().join("page.png");
    image
        .save_with_format(&input_path, ImageFormat::Png)
        .map_err(|e| format!("cannot write tesseract input: {e}"))?;
    Ok((tmpdir, input_path))
}
