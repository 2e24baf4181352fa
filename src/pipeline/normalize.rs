//! Normalisation: deterministic cleanup of extracted and model-produced text.
//!
//! Extracted text is normalised once, when the [`crate::document::Document`]
//! is built, so the segmenter and translator only ever see `\n` line breaks
//! and no invisible characters. pdfium in particular reports line ends as
//! `\r\n` and leaves soft hyphens and form feeds in the page text.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so the per-line rules see clean lines,
//! and blank-line collapsing runs last because trimming can turn
//! whitespace-only lines into blank ones.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all extraction cleanup rules.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 3. Drop control characters other than `\n` and `\t`
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive blank lines down to 2
pub fn clean_extracted_text(input: &str) -> String {
    collapse_blank_lines(&clean_paragraph_text(input))
}

/// Rules 1 to 4 only.
///
/// Word documents map one paragraph to one line, so their empty paragraphs
/// are kept one-to-one instead of being collapsed.
pub fn clean_paragraph_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = remove_control_chars(&s);
    trim_trailing_whitespace(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FFFE}',
        ],
        "",
    )
}

// ── Rule 3: Remove control characters ───────────────────────────────────────

static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

fn remove_control_chars(input: &str) -> String {
    RE_CONTROL.replace_all(input, "").to_string()
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Model output ─────────────────────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:[A-Za-z]+)?\n(.*)\n```\s*$").unwrap());

/// Remove a ```` ``` ```` fence wrapping the whole of a model's answer.
///
/// Chat models sometimes fence their output despite being told not to.
pub fn strip_outer_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}
