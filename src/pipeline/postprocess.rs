//! Post-processing: normalise raw OCR output.
//!
//! Tesseract pads its output with blank lines, leading indentation and
//! trailing spaces. [`clean_text`] keeps every line that has visible
//! characters, trimmed, in their input order.

/// Trim each line, drop the blank ones and rejoin with `\n`.
///
/// Pure and idempotent: `clean_text(&clean_text(s)) == clean_text(s)`.
/// `\r\n` line endings are handled because the trailing `\r` is whitespace.
pub fn clean_text(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let raw = "  HELLO WORLD  \n\n\t\nsecond line\t\n   \n";
        assert_eq!(clean_text(raw), "HELLO WORLD\nsecond line");
    }

    #[test]
    fn handles_crlf() {
        assert_eq!(clean_text("a\r\n\r\nb\r\n"), "a\nb");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(clean_text(" \n\t\n\u{0c}\n"), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "x",
            "\n\n  a \n b\n\n",
            "line one\r\n  line two  \r\n\r\n",
            "   \u{a0}indented\u{a0}  \n\tTabbed",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "input: {s:?}");
        }
    }

    #[test]
    fn never_reorders_or_leaves_blank_lines() {
        let raw = "z\n\n  y\n x \n\n\nw";
        let cleaned = clean_text(raw);
        assert!(cleaned.lines().all(|l| !l.trim().is_empty()));
        assert_eq!(cleaned.lines().collect::<Vec<_>>(), vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn keeps_inner_spacing() {
        assert_eq!(clean_text("  a   b  "), "a   b");
    }
}
