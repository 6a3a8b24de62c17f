//! Input dispatch: classify a user-supplied path by its extension.
//!
//! The decision is made from the extension alone, compared
//! case-insensitively against [`SUPPORTED_EXTENSIONS`]. No bytes are read
//! during classification, so an unsupported path fails before any file
//! system access. [`resolve_input`] then checks that the file exists.

use crate::error::OcrError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recognised extensions, lower-case and dot-prefixed.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".pdf"];

/// Which pipeline a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A raster image decoded directly.
    Image,
    /// A PDF rasterised page by page.
    Pdf,
}

/// A path together with the kind derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Lower-cased, dot-prefixed extension of `path`, or `""` if it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Route `path` by extension alone.
pub fn classify(path: &Path) -> Result<SourceFile, OcrError> {
    let extension = extension_of(path);
    let kind = match extension.as_str() {
        ".jpg" | ".jpeg" | ".png" => SourceKind::Image,
        ".pdf" => SourceKind::Pdf,
        _ => {
            return Err(OcrError::UnsupportedFormat {
                extension,
                supported: SUPPORTED_EXTENSIONS.to_vec(),
            })
        }
    };
    Ok(SourceFile {
        path: path.to_path_buf(),
        kind,
    })
}

/// Classify `path` and verify it exists.
pub fn resolve_input(path: &Path) -> Result<SourceFile, OcrError> {
    let source = classify(path)?;
    if !source.path.is_file() {
        return Err(OcrError::FileNotFound { path: source.path });
    }
    debug!("Resolved {:?} input: {}", source.kind, source.path.display());
    Ok(source)
}

/// Strip surrounding whitespace and quote characters from a pasted path, as
/// produced by drag-and-drop into a terminal. Quotes are removed from each end
/// independently, so a path with only an opening quote is cleaned too.
pub fn normalize_path_input(raw: &str) -> &str {
    raw.trim().trim_matches(['"', '\'']).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_routes_by_extension_case_insensitively() {
        for p in ["a.jpg", "a.JPG", "b.jpeg", "c.PnG"] {
            assert_eq!(classify(Path::new(p)).unwrap().kind, SourceKind::Image, "{p}");
        }
        assert_eq!(classify(Path::new("doc.PDF")).unwrap().kind, SourceKind::Pdf);
    }

    #[test]
    fn classify_rejects_txt_naming_it_and_the_supported_set() {
        match classify(Path::new("notes.txt")) {
            Err(OcrError::UnsupportedFormat {
                extension,
                supported,
            }) => {
                assert_eq!(extension, ".txt");
                assert_eq!(supported, SUPPORTED_EXTENSIONS.to_vec());
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn classify_rejects_missing_extension() {
        let err = classify(Path::new("/tmp/README")).unwrap_err();
        assert!(
            matches!(err, OcrError::UnsupportedFormat { ref extension, .. } if extension.is_empty())
        );
    }

    #[test]
    fn unsupported_extension_wins_over_missing_file() {
        // No file system access happens before the extension check.
        let err = resolve_input(Path::new("/no/such/file.gif")).unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedFormat { .. }));
    }

    #[test]
    fn resolve_reports_missing_file() {
        let err = resolve_input(Path::new("/no/such/file.png")).unwrap_err();
        assert!(matches!(err, OcrError::FileNotFound { .. }));
    }

    #[test]
    fn resolve_accepts_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpeg");
        std::fs::write(&path, b"not really a jpeg").unwrap();
        let source = resolve_input(&path).unwrap();
        assert_eq!(source.kind, SourceKind::Image);
        assert_eq!(source.path, path);
    }

    #[test]
    fn normalize_strips_quotes_and_whitespace() {
        assert_eq!(normalize_path_input("  \"/tmp/a b.png\" \n"), "/tmp/a b.png");
        assert_eq!(normalize_path_input("'/tmp/x.pdf'"), "/tmp/x.pdf");
        assert_eq!(normalize_path_input("/tmp/plain.jpg"), "/tmp/plain.jpg");
    }

    #[test]
    fn normalize_strips_unbalanced_quotes() {
        assert_eq!(normalize_path_input("\"scan.png"), "scan.png");
        assert_eq!(normalize_path_input("scan.png'"), "scan.png");
        assert_eq!(normalize_path_input(" \"'/tmp/mixed.pdf\" "), "/tmp/mixed.pdf");
        assert_eq!(normalize_path_input("\"\""), "");
    }
}
