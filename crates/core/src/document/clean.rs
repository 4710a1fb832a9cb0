//! Whitespace normalization and title stripping for extracted text.

use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Longest line still considered a title candidate.
const MAX_TITLE_CHARS: usize = 120;

/// Most words a title-case line may have.
const MAX_TITLE_WORDS: usize = 12;

/// A first line shorter than this, followed by much longer content, is
/// treated as a title.
const SHORT_LINE_CHARS: usize = 60;

/// Minimum length of the line following a short title line.
const LONG_LINE_CHARS: usize = 100;

/// Words left lowercase in title case.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the", "to",
    "vs", "with",
];

/// Collapse horizontal whitespace, trim each line, and squeeze three or more
/// newlines down to a single blank line.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = unified
        .lines()
        .map(|line| HORIZONTAL_WS.replace_all(line, " ").trim().to_string())
        .collect();
    EXCESS_NEWLINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// Normalize and optionally drop a presumed title line.
pub fn clean_text(raw: &str, strip: bool) -> String {
    let normalized = normalize_whitespace(raw);
    if strip {
        strip_title(&normalized)
    } else {
        normalized
    }
}

/// First line of already-normalized `text` if it looks like a title.
///
/// Never fires when the line is the whole document.
pub fn detect_title(text: &str) -> Option<&str> {
    let mut lines = text.lines();
    let first = lines.next()?.trim();
    let next = lines.map(str::trim).find(|l| !l.is_empty())?;

    if first.is_empty() || first.chars().count() > MAX_TITLE_CHARS {
        return None;
    }
    if is_all_caps(first) || is_title_case(first) {
        return Some(first);
    }

    let first_len = first.chars().count();
    let next_len = next.chars().count();
    if first_len < SHORT_LINE_CHARS && next_len >= LONG_LINE_CHARS && next_len > first_len * 2 {
        return Some(first);
    }
    None
}

/// Remove the detected title line and any blank lines after it.
pub fn strip_title(text: &str) -> String {
    match detect_title(text) {
        Some(_) => text
            .split_once('\n')
            .map(|(_, rest)| rest.trim_start().to_string())
            .unwrap_or_default(),
        None => text.to_string(),
    }
}

/// At least two letters and no lowercase ones.
pub(crate) fn is_all_caps(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2 && !line.chars().any(char::is_lowercase)
}

/// Short line, no sentence punctuation at the end, every significant word
/// capitalized.
pub(crate) fn is_title_case(line: &str) -> bool {
    if ends_like_sentence(line) {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_TITLE_WORDS {
        return false;
    }

    let mut capitalized = 0;
    for (i, word) in words.iter().enumerate() {
        let Some(first) = word.chars().find(|c| c.is_alphabetic()) else {
            continue;
        };
        if first.is_uppercase() {
            capitalized += 1;
        } else if i == 0 || !MINOR_WORDS.contains(&word.to_lowercase().as_str()) {
            return false;
        }
    }
    capitalized > 0
}

fn ends_like_sentence(line: &str) -> bool {
    line.trim_end().ends_with(['.', ',', ';', ':'])
}
