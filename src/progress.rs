//! Per-page event channel for PDF extraction.
//!
//! Pages that yield no text are dropped from the output without any message.
//! Callers that want to know which pages were dropped, and why, inject an
//! [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`]. The default
//! output is the same with or without a callback.
//!
//! # Example
//!
//! ```rust
//! use img2txt::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::Arc;
//!
//! struct SkippedPages;
//!
//! impl ExtractionProgressCallback for SkippedPages {
//!     fn on_page_error(&self, page_num: usize, _total_pages: usize, error: &str) {
//!         eprintln!("skipped page {page_num}: {error}");
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(SkippedPages))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the PDF page walker as it processes each page.
///
/// Every method has a no-op default. With `concurrency > 1`, page events
/// may arrive from several tasks at once and out of page order.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once the document is rasterised, before any page is OCRed.
    ///
    /// `total_pages` counts only the selected pages.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page is preprocessed. `page_num` is 1-indexed.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page produced cleaned, non-empty text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when a page was skipped.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every selected page has been attempted.
    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// The callback used when none is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ExtractionProgressCallback for Recorder {
        fn on_page_complete(&self, page_num: usize, _total_pages: usize, text_len: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("ok {page_num} {text_len}"));
        }

        fn on_page_error(&self, page_num: usize, _total_pages: usize, error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("err {page_num} {error}"));
        }
    }

    #[test]
    fn defaults_are_no_ops() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(3);
        cb.on_page_start(1, 3);
        cb.on_page_complete(1, 3, 10);
        cb.on_page_error(2, 3, "no text");
        cb.on_extraction_complete(3, 1);
    }

    #[test]
    fn overridden_methods_receive_events() {
        let rec = Recorder::default();
        rec.on_extraction_start(2);
        rec.on_page_complete(1, 2, 11);
        rec.on_page_error(2, 2, "no text found");
        let events = rec.events.lock().unwrap();
        assert_eq!(*events, vec!["ok 1 11", "err 2 no text found"]);
    }
}
