//! Plain text to HTML with inferred headings and inline emphasis.

use std::sync::LazyLock;

use regex::Regex;

use super::clean::{is_all_caps, is_title_case};

static STRONG_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("valid regex"));
static STRONG_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\n]+?)__").expect("valid regex"));
static EM_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("valid regex"));
static EM_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+?)_\b").expect("valid regex"));

const H1_MAX_CHARS: usize = 40;
const HEADING_MAX_CHARS: usize = 80;

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Heading level for a single-line block, judged by case and length.
fn heading_level(line: &str) -> Option<u8> {
    let len = line.chars().count();
    if len > HEADING_MAX_CHARS {
        return None;
    }
    if is_all_caps(line) {
        return Some(if len <= H1_MAX_CHARS { 1 } else { 2 });
    }
    is_title_case(line).then_some(3)
}

fn apply_inline_markup(escaped: &str) -> String {
    let text = STRONG_STARS.replace_all(escaped, "<strong>$1</strong>");
    let text = STRONG_UNDERSCORES.replace_all(&text, "<strong>$1</strong>");
    let text = EM_STAR.replace_all(&text, "<em>$1</em>");
    EM_UNDERSCORE.replace_all(&text, "<em>$1</em>").into_owned()
}

/// Convert cleaned text to HTML.
///
/// Blocks are separated by blank lines. A one-line block that looks like a
/// heading becomes `<h1>`..`<h3>`; everything else is a `<p>` with `<br>`
/// for inner line breaks.
pub fn text_to_html(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if !block.contains('\n') {
                if let Some(level) = heading_level(block) {
                    return format!("<h{level}>{}</h{level}>", escape_html(block));
                }
            }
            let lines: Vec<String> = block
                .lines()
                .map(|line| apply_inline_markup(&escape_html(line.trim())))
                .collect();
            format!("<p>{}</p>", lines.join("<br>"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
