//! Interactive terminal menu.
//!
//! Pure presentation over [`crate::extract`] and [`crate::persist`]: every
//! pipeline error is printed and control returns to the menu. The loop is
//! generic over an async reader and writer so it runs the same against a
//! terminal or an in-memory buffer.

use crate::config::ExtractionConfig;
use crate::error::OcrError;
use crate::extract::extract;
use crate::persist::{save_text, DEFAULT_OUTPUT_FILE};
use crate::pipeline::input::normalize_path_input;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Characters of extracted text shown before the save prompt.
pub const PREVIEW_CHARS: usize = 500;

const RULE_WIDE: usize = 50;
const RULE_NARROW: usize = 30;

/// Top-level menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Extract,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "extract" => Some(Choice::Extract),
            "2" | "exit" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// First `limit` characters of `text`, followed by `...` when truncated.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// The interactive extract/exit loop.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R, W> Menu<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what was printed.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks exit or input ends.
    ///
    /// Only I/O failures on the terminal itself are returned; extraction and
    /// save errors are reported inline.
    pub async fn run(&mut self, config: &ExtractionConfig) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDE);
        self.say(&rule).await?;
        self.say("       SIMPLE OCR TEXT EXTRACTOR").await?;
        self.say(&rule).await?;

        loop {
            self.say("\nOptions:").await?;
            self.say("1. Extract text from image/PDF").await?;
            self.say("2. Exit").await?;

            let Some(line) = self.ask("\nEnter your choice (1-2): ").await? else {
                debug!("Menu input closed");
                return Ok(());
            };

            match Choice::parse(&line) {
                Some(Choice::Extract) => {
                    if !self.extract_once(config).await? {
                        return Ok(());
                    }
                }
                Some(Choice::Exit) => {
                    self.say("Goodbye!").await?;
                    return Ok(());
                }
                None => self.say("❌ Invalid choice!").await?,
            }
        }
    }

    /// One extract round. Returns `false` when input ended mid-round.
    async fn extract_once(&mut self, config: &ExtractionConfig) -> io::Result<bool> {
        let Some(raw) = self.ask("Enter image/PDF file path: ").await? else {
            return Ok(false);
        };
        let path = PathBuf::from(normalize_path_input(&raw));

        if tokio::fs::metadata(&path).await.is_err() {
            let err = OcrError::FileNotFound { path };
            self.say(&format!("❌ {err}")).await?;
            return Ok(true);
        }

        self.say("⏳ Processing...").await?;
        let extraction = match extract(&path, config).await {
            Ok(extraction) => extraction,
            Err(e) => {
                self.say(&format!("❌ {e}")).await?;
                return Ok(true);
            }
        };

        let rule = "=".repeat(RULE_NARROW);
        self.say("✅ Text extracted successfully!").await?;
        self.say(&format!("\n{rule}")).await?;
        self.say("EXTRACTED TEXT:").await?;
        self.say(&rule).await?;
        self.say(&preview(&extraction.text, PREVIEW_CHARS)).await?;
        self.say(&rule).await?;

        let Some(answer) = self.ask("\nSave to file? (y/n): ").await? else {
            return Ok(false);
        };
        if answer.trim().eq_ignore_ascii_case("y") {
            let prompt = format!("Output file path (default: {DEFAULT_OUTPUT_FILE}): ");
            let Some(target) = self.ask(&prompt).await? else {
                return Ok(false);
            };
            let target = match target.trim() {
                "" => DEFAULT_OUTPUT_FILE,
                t => t,
            };
            match save_text(&extraction.text, target).await {
                Ok(()) => self.say(&format!("✅ Text saved to: {target}")).await?,
                Err(e) => self.say(&format!("❌ {e}")).await?,
            }
        }
        Ok(true)
    }

    async fn say(&mut self, line: &str) -> io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Print `prompt` and read one line. `None` on end of input.
    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
