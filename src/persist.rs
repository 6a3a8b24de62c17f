//! Writing extracted text to disk.

use crate::error::OcrError;
use std::path::Path;
use tracing::info;

/// Default file name offered by the interactive menu.
pub const DEFAULT_OUTPUT_FILE: &str = "extracted_text.txt";

/// Write `text` as UTF-8 to `output_path`, replacing any existing file.
///
/// The write is direct: no temp file, no rename, no backup. Missing parent
/// directories are not created.
pub async fn save_text(text: &str, output_path: impl AsRef<Path>) -> Result<(), OcrError> {
    let path = output_path.as_ref();
    tokio::fs::write(path, text.as_bytes())
        .await
        .map_err(|e| OcrError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!("Text saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let text = "--- Page 1 ---\nGrüße, 世界 ✓\n\n";
        save_text(text, &path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "a much longer previous content").unwrap();
        save_text("short", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[tokio::test]
    async fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.txt");
        let err = save_text("x", &path).await.unwrap_err();
        match err {
            OcrError::WriteError { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected WriteError, got {other:?}"),
        }
    }
}
