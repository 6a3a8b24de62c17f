//! Result types returned by the extraction entry points.

use crate::error::PageError;
use crate::pipeline::input::SourceFile;
use serde::{Deserialize, Serialize};

/// Successful extraction of a whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// The dispatched input.
    pub source: SourceFile,
    /// Final text, never empty. For PDFs this is the concatenation of
    /// [`page_block`]s of the pages that produced text.
    pub text: String,
    /// Per-page outcomes in ascending page order. Empty for images.
    pub pages: Vec<PageOutcome>,
    pub stats: ExtractionStats,
}

/// What happened to one PDF page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    /// 1-indexed page number within the document.
    pub page_num: usize,
    /// Cleaned text, empty when `error` is set.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PageError>,
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document (1 for images).
    pub total_pages: usize,
    /// Pages that contributed text.
    pub processed_pages: usize,
    /// Selected pages that were skipped.
    pub failed_pages: usize,
    pub duration_ms: u64,
}

/// The block a successful page contributes to the document text.
pub fn page_block(page_num: usize, text: &str) -> String {
    format!("--- Page {} ---\n{}\n\n", page_num, text)
}

/// Concatenate the blocks of successful pages in ascending page order.
pub fn assemble_pages(pages: &[PageOutcome]) -> String {
    let mut ordered: Vec<&PageOutcome> = pages.iter().filter(|p| p.is_success()).collect();
    ordered.sort_by_key(|p| p.page_num);
    ordered
        .iter()
        .map(|p| page_block(p.page_num, &p.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(page_num: usize, text: &str) -> PageOutcome {
        PageOutcome {
            page_num,
            text: text.to_string(),
            error: None,
        }
    }

    fn failed(page_num: usize) -> PageOutcome {
        PageOutcome {
            page_num,
            text: String::new(),
            error: Some(PageError::NoText { page: page_num }),
        }
    }

    #[test]
    fn page_block_format() {
        assert_eq!(page_block(3, "abc\ndef"), "--- Page 3 ---\nabc\ndef\n\n");
    }

    #[test]
    fn assemble_skips_failed_pages_and_orders_by_page() {
        let pages = vec![ok(3, "three"), failed(2), ok(1, "one")];
        assert_eq!(
            assemble_pages(&pages),
            "--- Page 1 ---\none\n\n--- Page 3 ---\nthree\n\n"
        );
    }

    #[test]
    fn assemble_all_failed_is_empty() {
        assert_eq!(assemble_pages(&[failed(1), failed(2)]), "");
    }

    #[test]
    fn failed_page_serializes_error_only_when_present() {
        let json = serde_json::to_string(&ok(1, "x")).unwrap();
        assert!(!json.contains("error"));
        let json = serde_json::to_string(&failed(2)).unwrap();
        assert!(json.contains("NoText"));
    }
}
