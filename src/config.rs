//! Configuration types for image and PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The OCR engine and the PDF rasteriser
//! are collaborators: the config either names which built-in backend to use
//! or carries a pre-constructed one, which always wins.

use crate::error::OcrError;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::render::PdfRasterizer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for an extraction run.
///
/// # Example
/// ```rust
/// use img2txt::{ExtractionConfig, PdfBackend};
///
/// let config = ExtractionConfig::builder()
///     .dpi(200)
///     .pdf_backend(PdfBackend::Pdftoppm)
///     .build()
///     .unwrap();
/// assert_eq!(config.language, "eng");
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    pub dpi: u32,

    /// Tesseract language tag. Default: `eng`.
    ///
    /// Fixed for the whole run; there is no per-call or per-page override.
    pub language: String,

    /// Command used to invoke tesseract. Default: `tesseract` (looked up on `PATH`).
    pub tesseract_cmd: PathBuf,

    /// Which built-in rasteriser handles PDFs. Ignored when `rasterizer` is set.
    pub pdf_backend: PdfBackend,

    /// Explicit libpdfium location for the [`PdfBackend::Pdfium`] backend.
    pub pdfium_lib_path: Option<PathBuf>,

    /// PDF pages to process. Default: all pages.
    pub pages: PageSelection,

    /// Number of PDF pages OCRed at once. Default: 1 (strictly sequential).
    ///
    /// Output order never depends on this value.
    pub concurrency: usize,

    /// Pre-constructed OCR engine. Takes precedence over `tesseract_cmd`.
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// Pre-constructed PDF rasteriser. Takes precedence over `pdf_backend`.
    pub rasterizer: Option<Arc<dyn PdfRasterizer>>,

    /// Optional per-page event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            language: "eng".to_string(),
            tesseract_cmd: PathBuf::from("tesseract"),
            pdf_backend: PdfBackend::default(),
            pdfium_lib_path: None,
            pages: PageSelection::default(),
            concurrency: 1,
            engine: None,
            rasterizer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("language", &self.language)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("pdf_backend", &self.pdf_backend)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("pages", &self.pages)
            .field("concurrency", &self.concurrency)
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field(
                "rasterizer",
                &self.rasterizer.as_ref().map(|r| r.name().to_string()),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl fmt::Debug for ExtractionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn pdf_backend(mut self, backend: PdfBackend) -> Self {
        self.config.pdf_backend = backend;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn PdfRasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, OcrError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(OcrError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.language.trim().is_empty() {
            return Err(OcrError::InvalidConfig("Language must not be empty".into()));
        }
        if c.tesseract_cmd.as_os_str().is_empty() {
            return Err(OcrError::InvalidConfig(
                "Tesseract command must not be empty".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(OcrError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Built-in PDF rasterisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfBackend {
    /// In-process rendering through libpdfium (`pdfium` feature).
    Pdfium,
    /// The `pdftoppm` command from poppler-utils.
    Pdftoppm,
    /// PDFs are rejected with [`OcrError::PdfUnsupported`].
    Disabled,
}

impl Default for PdfBackend {
    fn default() -> Self {
        if cfg!(feature = "pdfium") {
            PdfBackend::Pdfium
        } else {
            PdfBackend::Pdftoppm
        }
    }
}

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Lowest page number the selection asks for (1-indexed).
    pub fn first_page(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
        }
    }
}

impl FromStr for PageSelection {
    type Err = OcrError;

    /// Parse `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let page = |p: &str| -> Result<usize, OcrError> {
            let n: usize = p
                .trim()
                .parse()
                .map_err(|_| OcrError::InvalidConfig(format!("Invalid page number: '{}'", p.trim())))?;
            if n < 1 {
                return Err(OcrError::InvalidConfig(format!(
                    "Pages are 1-indexed, minimum is 1 (got {})",
                    n
                )));
            }
            Ok(n)
        };

        if s == "all" {
            return Ok(PageSelection::All);
        }
        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(OcrError::InvalidConfig(format!(
                    "Invalid page range '{}-{}': start must be <= end",
                    start, end
                )));
            }
            return Ok(PageSelection::Range(start, end));
        }
        if s.contains(',') {
            let pages = s.split(',').map(page).collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }
        Ok(PageSelection::Single(page(&s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tesseract_english_at_300_dpi() {
        let c = ExtractionConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.language, "eng");
        assert_eq!(c.tesseract_cmd, PathBuf::from("tesseract"));
        assert_eq!(c.concurrency, 1);
        assert_eq!(c.pages, PageSelection::All);
    }

    #[test]
    fn builder_clamps_dpi_and_concurrency() {
        let c = ExtractionConfig::builder()
            .dpi(10_000)
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(c.dpi, 600);
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn builder_rejects_empty_language() {
        let err = ExtractionConfig::builder().language("  ").build().unwrap_err();
        assert!(matches!(err, OcrError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_empty_tesseract_cmd() {
        let err = ExtractionConfig::builder()
            .tesseract_cmd("")
            .build()
            .unwrap_err();
        assert!(matches!(err, OcrError::InvalidConfig(_)));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::Single(2).to_indices(3), vec![1]);
        assert_eq!(PageSelection::Single(0).to_indices(3), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 10).to_indices(3), vec![1, 2]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(3),
            vec![0, 2]
        );
    }

    #[test]
    fn page_selection_first_page() {
        assert_eq!(PageSelection::All.first_page(), 1);
        assert_eq!(PageSelection::Single(7).first_page(), 7);
        assert_eq!(PageSelection::Range(60, 70).first_page(), 60);
        assert_eq!(PageSelection::Set(vec![9, 4, 12]).first_page(), 4);
    }

    #[test]
    fn page_selection_parses_cli_syntax() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!(" 5 ".parse::<PageSelection>().unwrap(), PageSelection::Single(5));
        assert_eq!("3-15".parse::<PageSelection>().unwrap(), PageSelection::Range(3, 15));
        assert_eq!(
            "1,3, 5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn page_selection_rejects_bad_input() {
        for bad in ["0", "5-2", "x", "1,,2", "-3"] {
            assert!(bad.parse::<PageSelection>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn debug_hides_injected_collaborators() {
        let dbg = format!("{:?}", ExtractionConfig::default());
        assert!(dbg.contains("dpi: 300"));
        assert!(dbg.contains("engine: None"));
    }
}
