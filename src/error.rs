//! Error types for the img2txt library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`OcrError`] is **fatal**: the extraction cannot produce any text
//!   (unsupported format, unreadable image, OCR engine missing, nothing
//!   recognised). Returned as `Err(OcrError)` from the `extract*` functions.
//!
//! * [`PageError`] is **non-fatal**: a single PDF page produced no text but
//!   other pages may still succeed. Stored inside
//!   [`crate::output::PageOutcome`] and never rendered into the output text.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the img2txt library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The file extension is not one of the recognised formats.
    #[error("Unsupported format: {}. Supported formats: {}. Use JPG, PNG, or PDF.",
        display_extension(.extension), join_extensions(.supported))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<&'static str>,
    },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The raster data could not be read or decoded.
    #[error("Could not read image '{path}': {detail}")]
    UnreadableImage { path: PathBuf, detail: String },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The OCR engine is missing or failed internally.
    #[error("OCR error ({engine}): {message}")]
    OcrEngineError { engine: String, message: String },

    /// Recognition succeeded but produced no non-whitespace text.
    #[error("No text found in '{path}'. Try a clearer image.")]
    NoTextFound { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// No PDF rasteriser is available in this build or configuration.
    #[error("PDF support is unavailable: {reason}")]
    PdfUnsupported { reason: String },

    /// The rasteriser was available but failed on this document.
    #[error("PDF error for '{path}': {detail}")]
    PdfRasterizeError { path: PathBuf, detail: String },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Error saving file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_extension(ext: &str) -> &str {
    if ext.is_empty() {
        "(no extension)"
    } else {
        ext
    }
}

fn join_extensions(exts: &[&str]) -> String {
    exts.join(", ")
}

/// A non-fatal error for a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The rendered page could not be preprocessed.
    #[error("Page {page}: preprocessing failed: {detail}")]
    PreprocessFailed { page: usize, detail: String },

    /// The OCR engine failed on this page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },

    /// The engine ran but the page holds no recognisable text.
    #[error("Page {page}: no text found")]
    NoText { page: usize },
}

impl PageError {
    /// 1-indexed page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::PreprocessFailed { page, .. }
            | PageError::OcrFailed { page, .. }
            | PageError::NoText { page } => *page,
        }
    }
}
