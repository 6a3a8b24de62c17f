//! PDF rasterisation: turn selected pages into `DynamicImage`s.
//!
//! The rasteriser is an injected capability. [`PdfSupport`] is either
//! `Available` with a concrete [`PdfRasterizer`] or `Unavailable` with the
//! reason, decided from the build features and the configuration before any
//! PDF is opened. Asking an unavailable backend to render yields
//! [`OcrError::PdfUnsupported`].
//!
//! Two backends ship with the crate:
//!
//! * [`PdfiumRasterizer`] (`pdfium` feature) renders in-process through
//!   libpdfium, bound at run time.
//! * [`PdftoppmRasterizer`] shells out to poppler's `pdfinfo` and `pdftoppm`.
//!
//! Only the requested pages are rendered. Rendering is CPU-bound and
//! blocking, so [`PdfSupport`] runs it on the blocking thread pool.

use crate::config::{ExtractionConfig, PdfBackend};
use crate::error::OcrError;
use image::DynamicImage;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts and renders the pages of a PDF.
pub trait PdfRasterizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Number of pages in the document. Blocking.
    fn page_count(&self, pdf_path: &Path) -> Result<usize, OcrError>;

    /// Render the pages at `page_indices` (0-based, ascending). Blocking.
    ///
    /// Returns `(page_index, image)` pairs in the order requested. Indices
    /// past the end of the document are skipped.
    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        page_indices: &[usize],
    ) -> Result<Vec<(usize, DynamicImage)>, OcrError>;
}

/// Whether PDFs can be processed in this build and configuration.
#[derive(Clone)]
pub enum PdfSupport {
    Available(Arc<dyn PdfRasterizer>),
    Unavailable { reason: String },
}

impl std::fmt::Debug for PdfSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfSupport::Available(r) => f.debug_tuple("Available").field(&r.name()).finish(),
            PdfSupport::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

impl PdfSupport {
    /// Pick the rasteriser for `config`: an injected one wins, then `pdf_backend`.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        if let Some(ref rasterizer) = config.rasterizer {
            return PdfSupport::Available(Arc::clone(rasterizer));
        }
        match config.pdf_backend {
            PdfBackend::Disabled => PdfSupport::Unavailable {
                reason: "PDF support is disabled in the configuration".to_string(),
            },
            PdfBackend::Pdftoppm => PdfSupport::Available(Arc::new(PdftoppmRasterizer::default())),
            PdfBackend::Pdfium => pdfium_support(config),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PdfSupport::Available(_))
    }

    fn backend(&self) -> Result<Arc<dyn PdfRasterizer>, OcrError> {
        match self {
            PdfSupport::Available(r) => Ok(Arc::clone(r)),
            PdfSupport::Unavailable { reason } => Err(OcrError::PdfUnsupported {
                reason: reason.clone(),
            }),
        }
    }

    /// Count the pages of `pdf_path` on the blocking thread pool.
    pub async fn page_count(&self, pdf_path: &Path) -> Result<usize, OcrError> {
        let rasterizer = self.backend()?;
        let path = pdf_path.to_path_buf();

        tokio::task::spawn_blocking(move || rasterizer.page_count(&path))
            .await
            .map_err(|e| OcrError::Internal(format!("Page count task panicked: {}", e)))?
    }

    /// Render the selected pages of `pdf_path` on the blocking thread pool.
    pub async fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        page_indices: &[usize],
    ) -> Result<Vec<(usize, DynamicImage)>, OcrError> {
        let rasterizer = self.backend()?;
        let path = pdf_path.to_path_buf();
        let indices = page_indices.to_vec();
        let name = rasterizer.name().to_string();

        let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&path, dpi, &indices))
            .await
            .map_err(|e| OcrError::Internal(format!("Render task panicked: {}", e)))??;

        info!("Rasterised {} pages at {} DPI with {}", pages.len(), dpi, name);
        Ok(pages)
    }
}

#[cfg(feature = "pdfium")]
fn pdfium_support(config: &ExtractionConfig) -> PdfSupport {
    PdfSupport::Available(Arc::new(PdfiumRasterizer::new(
        config.pdfium_lib_path.clone(),
    )))
}

#[cfg(not(feature = "pdfium"))]
fn pdfium_support(_config: &ExtractionConfig) -> PdfSupport {
    PdfSupport::Unavailable {
        reason: "img2txt was built without the `pdfium` feature; use the pdftoppm backend"
            .to_string(),
    }
}

// ── pdfium ───────────────────────────────────────────────────────────────

/// In-process rasteriser backed by libpdfium.
#[cfg(feature = "pdfium")]
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    lib_path: Option<PathBuf>,
}

#[cfg(feature = "pdfium")]
impl PdfiumRasterizer {
    /// Bind to the library at `lib_path`, or the system library when `None`.
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    fn bind(&self) -> Result<pdfium_render::prelude::Pdfium, OcrError> {
        use pdfium_render::prelude::Pdfium;

        let bindings = match self.lib_path {
            Some(ref path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| OcrError::PdfUnsupported {
            reason: format!(
                "cannot load libpdfium ({:?}); set PDFIUM_LIB_PATH or use the pdftoppm backend",
                e
            ),
        })?;
        Ok(Pdfium::new(bindings))
    }
}

#[cfg(feature = "pdfium")]
fn load_error(pdf_path: &Path, e: pdfium_render::prelude::PdfiumError) -> OcrError {
    OcrError::PdfRasterizeError {
        path: pdf_path.to_path_buf(),
        detail: format!("{:?}", e),
    }
}

#[cfg(feature = "pdfium")]
impl PdfRasterizer for PdfiumRasterizer {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn page_count(&self, pdf_path: &Path) -> Result<usize, OcrError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| load_error(pdf_path, e))?;
        Ok(document.pages().len() as usize)
    }

    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        page_indices: &[usize],
    ) -> Result<Vec<(usize, DynamicImage)>, OcrError> {
        use pdfium_render::prelude::PdfRenderConfig;

        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| load_error(pdf_path, e))?;

        // PDF user space is 72 units per inch.
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        let mut images = Vec::with_capacity(page_indices.len());
        for &idx in page_indices {
            if idx >= total_pages {
                warn!(
                    "Skipping page {} (out of range, total={})",
                    idx + 1,
                    total_pages
                );
                continue;
            }
            let render_error = |e: pdfium_render::prelude::PdfiumError| OcrError::PdfRasterizeError {
                path: pdf_path.to_path_buf(),
                detail: format!("page {}: {:?}", idx + 1, e),
            };
            let page = pages.get(idx as u16).map_err(render_error)?;
            let bitmap = page.render_with_config(&render_config).map_err(render_error)?;
            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push((idx, image));
        }
        Ok(images)
    }
}

// ── pdftoppm ─────────────────────────────────────────────────────────────

/// Rasteriser wrapping the poppler-utils CLI tools: `pdfinfo` for the page
/// count and `pdftoppm` for rendering.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    cmd: PathBuf,
    info_cmd: PathBuf,
}

impl PdftoppmRasterizer {
    pub fn new(cmd: impl Into<PathBuf>) -> Self {
        Self {
            cmd: cmd.into(),
            info_cmd: PathBuf::from("pdfinfo"),
        }
    }

    /// Use `cmd` instead of `pdfinfo` for page counting.
    pub fn with_pdfinfo(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.info_cmd = cmd.into();
        self
    }

    fn run(&self, cmd: &Path, args: &[&OsStr], pdf_path: &Path) -> Result<Output, OcrError> {
        let output = match Command::new(cmd).args(args).output() {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::PdfUnsupported {
                    reason: format!("{} not found (install poppler-utils)", cmd.display()),
                })
            }
            Err(e) => {
                return Err(OcrError::PdfRasterizeError {
                    path: pdf_path.to_path_buf(),
                    detail: format!("cannot run {}: {e}", cmd.display()),
                })
            }
        };
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::PdfRasterizeError {
                path: pdf_path.to_path_buf(),
                detail: format!("{} failed ({}): {}", cmd.display(), output.status, stderr.trim()),
            });
        }
        Ok(output)
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PdfRasterizer for PdftoppmRasterizer {
    fn name(&self) -> &str {
        "pdftoppm"
    }

    fn page_count(&self, pdf_path: &Path) -> Result<usize, OcrError> {
        let output = self.run(&self.info_cmd, &[pdf_path.as_os_str()], pdf_path)?;
        let info = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&info).ok_or_else(|| OcrError::PdfRasterizeError {
            path: pdf_path.to_path_buf(),
            detail: "pdfinfo reported no page count".to_string(),
        })
    }

    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        page_indices: &[usize],
    ) -> Result<Vec<(usize, DynamicImage)>, OcrError> {
        let rasterize_error = |detail: String| OcrError::PdfRasterizeError {
            path: pdf_path.to_path_buf(),
            detail,
        };
        if page_indices.is_empty() {
            return Ok(Vec::new());
        }

        // Page files only live inside this directory; it is removed when
        // the function returns.
        let tmpdir = tempfile::TempDir::with_prefix("img2txt-pdf-")
            .map_err(|e| rasterize_error(format!("cannot create temp dir: {e}")))?;
        let prefix = tmpdir.path().join("page");
        let dpi = dpi.to_string();

        for (first, last) in page_runs(page_indices) {
            let (first, last) = (first.to_string(), last.to_string());
            let args = [
                OsStr::new("-png"),
                OsStr::new("-r"),
                OsStr::new(&dpi),
                OsStr::new("-f"),
                OsStr::new(&first),
                OsStr::new("-l"),
                OsStr::new(&last),
                pdf_path.as_os_str(),
                prefix.as_os_str(),
            ];
            self.run(&self.cmd, &args, pdf_path)?;
        }

        let files: HashMap<usize, PathBuf> = std::fs::read_dir(tmpdir.path())
            .map_err(|e| rasterize_error(format!("cannot list rendered pages: {e}")))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                page_number_of(&name.to_string_lossy()).map(|n| (n, entry.path()))
            })
            .collect();

        let mut images = Vec::with_capacity(page_indices.len());
        for &idx in page_indices {
            let Some(path) = files.get(&(idx + 1)) else {
                warn!("pdftoppm produced no image for page {}", idx + 1);
                continue;
            };
            let image = image::open(path)
                .map_err(|e| rasterize_error(format!("page {}: {e}", idx + 1)))?;
            images.push((idx, image));
        }
        Ok(images)
    }
}

/// `Pages:` value from `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|n| n.trim().parse().ok())
}

/// Group ascending 0-based indices into inclusive 1-based `(first, last)`
/// runs, one pdftoppm call each.
fn page_runs(page_indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &idx in page_indices {
        let page = idx + 1;
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == page => *last = page,
            _ => runs.push((page, page)),
        }
    }
    runs
}

/// Page number encoded in a pdftoppm output name such as `page-07.png`.
///
/// The zero padding width depends on the document's page count.
fn page_number_of(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix("page-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}
