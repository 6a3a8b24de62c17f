//! CLI binary for img2txt.
//!
//! With an input path it extracts once and prints or saves the text. Without
//! one it starts the interactive menu.

use anyhow::{Context, Result};
use clap::Parser;
use img2txt::{
    extract, extract_to_file, ExtractionConfig, ExtractionProgressCallback, Menu, PageSelection,
    PdfBackend, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner for one-shot runs. With `show_errors`, each skipped page gets a
/// line above the spinner.
struct CliPageReporter {
    bar: ProgressBar,
    show_errors: bool,
    skipped: AtomicUsize,
}

impl CliPageReporter {
    fn new(show_errors: bool) -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Extracting");
        bar.set_message("Reading input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            show_errors,
            skipped: AtomicUsize::new(0),
        })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ExtractionProgressCallback for CliPageReporter {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_message(format!("{total_pages} pages"));
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.bar
            .set_message(format!("page {page_num}/{total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        if self.show_errors {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                green("✓"),
                page_num,
                total_pages,
                dim(&format!("{text_len:>5} chars")),
            ));
        }
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        if self.show_errors {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                red("✗"),
                page_num,
                total_pages,
                red(error),
            ));
        }
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        self.bar.finish_and_clear();
        if self.show_errors && success_count < total_pages {
            eprintln!(
                "{} {}/{} pages with text  ({} skipped)",
                cyan("⚠"),
                bold(&success_count.to_string()),
                total_pages,
                red(&self.skipped.load(Ordering::SeqCst).to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive menu
  img2txt

  # Print the text of an image
  img2txt scan.png

  # Save the text of a PDF
  img2txt report.pdf -o report.txt

  # Selected pages, German, pages rendered by poppler
  img2txt --pages 2-4 --lang deu --pdf-backend pdftoppm book.pdf

  # Show which PDF pages produced no text
  img2txt --show-page-errors scanned.pdf

  # JSON output with per-page outcomes
  img2txt --json report.pdf > report.json

REQUIREMENTS:
  tesseract     OCR engine, with the language data for --lang
  libpdfium     PDF rendering (pdfium backend); set PDFIUM_LIB_PATH if not on the system path
  pdftoppm      PDF rendering (pdftoppm backend, from poppler-utils)

ENVIRONMENT VARIABLES:
  IMG2TXT_OUTPUT, IMG2TXT_DPI, IMG2TXT_LANG, IMG2TXT_PAGES, IMG2TXT_PDF_BACKEND,
  IMG2TXT_TESSERACT_CMD, IMG2TXT_CONCURRENCY, IMG2TXT_JSON,
  IMG2TXT_SHOW_PAGE_ERRORS, IMG2TXT_VERBOSE, IMG2TXT_QUIET
                    Fallbacks for the matching flags
  PDFIUM_LIB_PATH   Path to an existing libpdfium
  RUST_LOG          Overrides the log filter
"#;

/// Extract text from images and PDFs with Tesseract OCR.
#[derive(Parser, Debug)]
#[command(
    name = "img2txt",
    version,
    about = "Extract text from images and PDFs with Tesseract OCR",
    long_about = "Extract text from JPEG, PNG and PDF files. Images are converted to \
grayscale and binarised with Otsu's method before OCR. PDF pages are rendered at a fixed \
DPI and their text is joined with '--- Page N ---' headers. Run without INPUT for an \
interactive menu.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image (.jpg, .jpeg, .png) or PDF file. Omit for the interactive menu.
    input: Option<PathBuf>,

    /// Write the text to this file instead of stdout.
    #[arg(short, long, env = "IMG2TXT_OUTPUT")]
    output: Option<PathBuf>,

    /// PDF rendering DPI (72–600).
    #[arg(long, env = "IMG2TXT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Tesseract language tag.
    #[arg(short, long = "lang", env = "IMG2TXT_LANG", default_value = "eng")]
    language: String,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "IMG2TXT_PAGES", default_value = "all")]
    pages: PageSelection,

    /// PDF renderer.
    #[arg(long, env = "IMG2TXT_PDF_BACKEND", value_enum)]
    pdf_backend: Option<PdfBackendArg>,

    /// Path to libpdfium for the pdfium backend.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Tesseract executable.
    #[arg(long, env = "IMG2TXT_TESSERACT_CMD", default_value = "tesseract")]
    tesseract_cmd: PathBuf,

    /// Number of PDF pages OCRed at once.
    #[arg(short, long, env = "IMG2TXT_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Print structured JSON (Extraction) to stdout instead of text.
    #[arg(long, env = "IMG2TXT_JSON", conflicts_with = "output")]
    json: bool,

    /// Report each PDF page that produced no text.
    #[arg(long, env = "IMG2TXT_SHOW_PAGE_ERRORS")]
    show_page_errors: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2TXT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PdfBackendArg {
    Pdfium,
    Pdftoppm,
    Disabled,
}

impl From<PdfBackendArg> for PdfBackend {
    fn from(v: PdfBackendArg) -> Self {
        match v {
            PdfBackendArg::Pdfium => PdfBackend::Pdfium,
            PdfBackendArg::Pdftoppm => PdfBackend::Pdftoppm,
            PdfBackendArg::Disabled => PdfBackend::Disabled,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let Some(input) = cli.input.clone() else {
        // ── Interactive mode ─────────────────────────────────────────────
        let config = build_config(&cli, None)?;
        let mut menu = Menu::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
        menu.run(&config).await.context("Terminal I/O failed")?;
        return Ok(());
    };

    // ── One-shot mode ────────────────────────────────────────────────────
    let reporter = (!cli.quiet && !cli.json).then(|| CliPageReporter::new(cli.show_page_errors));
    let config = build_config(
        &cli,
        reporter
            .clone()
            .map(|r| r as Arc<dyn ExtractionProgressCallback>),
    )?;

    let result = match cli.output {
        Some(ref output_path) => extract_to_file(&input, output_path, &config).await,
        None => extract(&input, &config).await,
    };
    if let Some(ref r) = reporter {
        r.finish();
    }
    let output = result.with_context(|| format!("Extraction failed for {}", input.display()))?;

    if let Some(ref output_path) = cli.output {
        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                green("✔"),
                output.stats.processed_pages,
                output.stats.total_pages,
                output.stats.duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .language(cli.language.clone())
        .tesseract_cmd(cli.tesseract_cmd.clone())
        .pages(cli.pages.clone())
        .concurrency(cli.concurrency);

    if let Some(backend) = cli.pdf_backend {
        builder = builder.pdf_backend(backend.into());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
