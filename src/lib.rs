//! # img2txt
//!
//! Extract text from images (JPEG, PNG) and PDF documents with Tesseract OCR.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path
//!  │
//!  ├─ 1. Input       classify by extension (.jpg .jpeg .png .pdf), check existence
//!  ├─ 2. Render      PDF only: rasterise each page (pdfium or pdftoppm, 300 DPI)
//!  ├─ 3. Preprocess  decode → grayscale → Otsu binarisation
//!  ├─ 4. OCR         tesseract, fixed language (default `eng`)
//!  ├─ 5. Clean       trim lines, drop blank ones
//!  └─ 6. Output      text (PDF: "--- Page N ---" blocks), optional save to file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2txt::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("scan.png", &config).await?;
//!     println!("{}", output.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `img2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `pdfium` | on      | In-process PDF rendering through libpdfium |
//!
//! Without `pdfium`, PDFs are rendered by poppler's `pdftoppm`, or rejected
//! with [`OcrError::PdfUnsupported`] when [`PdfBackend::Disabled`] is chosen.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod menu;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageSelection, PdfBackend};
pub use error::{OcrError, PageError};
pub use extract::{extract, extract_image, extract_pdf, extract_sync, extract_to_file};
pub use menu::Menu;
pub use output::{Extraction, ExtractionStats, PageOutcome};
pub use persist::save_text;
pub use pipeline::input::{SourceFile, SourceKind, SUPPORTED_EXTENSIONS};
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::postprocess::clean_text;
pub use pipeline::preprocess::PreprocessedImage;
pub use pipeline::render::{PdfRasterizer, PdfSupport, PdftoppmRasterizer};
#[cfg(feature = "pdfium")]
pub use pipeline::render::PdfiumRasterizer;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
