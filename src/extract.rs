//! Extraction entry points.
//!
//! [`extract`] dispatches on the file extension and runs one of two paths:
//!
//! * image: read → preprocess → OCR → clean
//! * PDF: rasterise → for each selected page (preprocess → OCR → clean) →
//!   concatenate page blocks
//!
//! Pages that yield no text are left out of the PDF output; their errors
//! are kept in [`Extraction::pages`] and reported through the progress
//! callback, never in the text.

use crate::config::ExtractionConfig;
use crate::error::{OcrError, PageError};
use crate::output::{assemble_pages, Extraction, ExtractionStats, PageOutcome};
use crate::persist;
use crate::pipeline::input::{self, SourceKind};
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::postprocess::clean_text;
use crate::pipeline::preprocess::{self, PreprocessedImage};
use crate::pipeline::render::PdfSupport;
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from an image or PDF file.
///
/// # Errors
/// Any variant of [`OcrError`]; in particular an empty result is always
/// [`OcrError::NoTextFound`], never `Ok` with empty text.
pub async fn extract(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Extraction, OcrError> {
    let start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting extraction: {}", input_path.display());

    // Extension check first: unsupported inputs never touch the disk.
    let source = input::resolve_input(input_path)?;
    let engine = resolve_engine(config);

    let (text, pages, total_pages) = match source.kind {
        SourceKind::Image => {
            let text = extract_image(&source.path, engine.as_ref(), &config.language).await?;
            (text, Vec::new(), 1)
        }
        SourceKind::Pdf => {
            let support = PdfSupport::from_config(config);
            let doc = extract_pdf(&source.path, &engine, &support, config).await?;
            (doc.text, doc.pages, doc.total_pages)
        }
    };

    let processed = if pages.is_empty() {
        1
    } else {
        pages.iter().filter(|p| p.is_success()).count()
    };
    let stats = ExtractionStats {
        total_pages,
        processed_pages: processed,
        failed_pages: pages.iter().filter(|p| !p.is_success()).count(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Extraction complete: {} chars, {}/{} pages, {}ms",
        text.chars().count(),
        stats.processed_pages,
        stats.total_pages,
        stats.duration_ms
    );

    Ok(Extraction {
        source,
        text,
        pages,
        stats,
    })
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally, so it must not be called
/// from inside an async context.
pub fn extract_sync(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Extraction, OcrError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| OcrError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_path, config))
}

/// Extract text and write it to `output_path` (see [`persist::save_text`]).
pub async fn extract_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Extraction, OcrError> {
    let extraction = extract(input_path, config).await?;
    persist::save_text(&extraction.text, output_path).await?;
    Ok(extraction)
}

/// Preprocess and OCR a single image file, returning cleaned text.
pub async fn extract_image(
    image_path: &Path,
    engine: &dyn OcrEngine,
    language: &str,
) -> Result<String, OcrError> {
    let path = image_path.to_path_buf();
    let preprocessed = tokio::task::spawn_blocking(move || preprocess::preprocess_file(&path))
        .await
        .map_err(|e| OcrError::Internal(format!("Preprocess task panicked: {}", e)))??;

    let raw = engine.recognize(&preprocessed, language).await?;
    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(OcrError::NoTextFound {
            path: image_path.to_path_buf(),
        });
    }
    Ok(text)
}

/// Text and per-page outcomes of a PDF.
#[derive(Debug, Clone)]
pub struct PdfText {
    pub text: String,
    /// Outcomes of the selected pages, ascending.
    pub pages: Vec<PageOutcome>,
    /// Pages in the document, selected or not.
    pub total_pages: usize,
}

/// Rasterise the selected pages of a PDF and OCR them.
///
/// Pages outside `config.pages` are never rendered. A selection that
/// matches no page is [`OcrError::PageOutOfRange`].
///
/// At most `config.concurrency` pages are in flight; outcomes are yielded
/// in page order regardless.
pub async fn extract_pdf(
    pdf_path: &Path,
    engine: &Arc<dyn OcrEngine>,
    support: &PdfSupport,
    config: &ExtractionConfig,
) -> Result<PdfText, OcrError> {
    let total_pages = support.page_count(pdf_path).await?;
    info!("PDF has {} pages", total_pages);

    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() {
        return Err(OcrError::PageOutOfRange {
            page: config.pages.first_page(),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for OCR", indices.len());

    let selected = support.rasterize(pdf_path, config.dpi, &indices).await?;
    let selected_count = selected.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(selected_count);
    }

    let pages: Vec<PageOutcome> = stream::iter(selected.into_iter().map(|(idx, img)| {
        let job = PageJob {
            page_num: idx + 1,
            total_pages: selected_count,
            engine: Arc::clone(engine),
            language: config.language.clone(),
            progress: config.progress_callback.clone(),
        };
        job.run(img)
    }))
    .buffered(config.concurrency)
    .collect()
    .await;

    let succeeded = pages.iter().filter(|p| p.is_success()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(selected_count, succeeded);
    }

    let text = assemble_pages(&pages);
    if text.is_empty() {
        return Err(OcrError::NoTextFound {
            path: pdf_path.to_path_buf(),
        });
    }

    Ok(PdfText {
        text,
        pages,
        total_pages,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn resolve_engine(config: &ExtractionConfig) -> Arc<dyn OcrEngine> {
    match config.engine {
        Some(ref engine) => Arc::clone(engine),
        None => Arc::new(TesseractEngine::new(config.tesseract_cmd.clone())),
    }
}

/// Everything one page task needs, owned so tasks can overlap.
struct PageJob {
    page_num: usize,
    total_pages: usize,
    engine: Arc<dyn OcrEngine>,
    language: String,
    progress: Option<ProgressCallback>,
}

impl PageJob {
    async fn run(self, img: DynamicImage) -> PageOutcome {
        if let Some(ref cb) = self.progress {
            cb.on_page_start(self.page_num, self.total_pages);
        }

        match self.ocr(img).await {
            Ok(text) => {
                if let Some(ref cb) = self.progress {
                    cb.on_page_complete(self.page_num, self.total_pages, text.len());
                }
                PageOutcome {
                    page_num: self.page_num,
                    text,
                    error: None,
                }
            }
            Err(error) => {
                debug!("Skipping page {}: {}", self.page_num, error);
                if let Some(ref cb) = self.progress {
                    cb.on_page_error(self.page_num, self.total_pages, &error.to_string());
                }
                PageOutcome {
                    page_num: self.page_num,
                    text: String::new(),
                    error: Some(error),
                }
            }
        }
    }

    async fn ocr(&self, img: DynamicImage) -> Result<String, PageError> {
        let page = self.page_num;
        let preprocessed: PreprocessedImage =
            tokio::task::spawn_blocking(move || preprocess::binarize(&img))
                .await
                .map_err(|e| PageError::PreprocessFailed {
                    page,
                    detail: e.to_string(),
                })?;

        let raw = self
            .engine
            .recognize(&preprocessed, &self.language)
            .await
            .map_err(|e| PageError::OcrFailed {
                page,
                detail: e.to_string(),
            })?;

        let text = clean_text(&raw);
        if text.is_empty() {
            return Err(PageError::NoText { page });
        }
        Ok(text)
    }
}
