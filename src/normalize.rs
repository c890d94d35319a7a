//! Canonical forms for scraped titles and descriptions.

use regex::Regex;
use std::sync::LazyLock;

static FACE_TO_FACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(f2f|face[\s\-]?to[\s\-]?face)\b").unwrap());
static TITLE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]\-_/]+").unwrap());
static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://\S+").unwrap());
static WWW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)www\.\S+").unwrap());
static PROTECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[?\s*(email\s*)?protected\s*\]?").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});
static EMAIL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(email|email id|e-mail|contact email)\b\s*[:\-]?\s*").unwrap()
});
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Lower-case, drop "f2f"/"face to face", turn brackets and separators into
/// spaces, collapse whitespace and render in title case.
pub fn normalize_title(raw: &str) -> String {
    let title = raw.to_lowercase();
    let title = FACE_TO_FACE.replace_all(&title, "");
    let title = TITLE_PUNCTUATION.replace_all(&title, " ");
    let title = MULTI_SPACE.replace_all(&title, " ");
    title_case(title.trim())
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
/// Digits and punctuation start a new run, so "c2c" becomes "C2C".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Strip contact artifacts from a description before it goes into a draft:
/// links, "[email protected]" placeholders, addresses and their labels.
pub fn clean_description(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace('\u{a0}', " ");
    let text = URL.replace_all(&text, "");
    let text = WWW.replace_all(&text, "");
    let text = PROTECTED.replace_all(&text, "");
    let text = EMAIL.replace_all(&text, "");
    let text = EMAIL_LABEL.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");

    text.trim().to_string()
}

/// Cleaned description as HTML: one escaped line per non-blank line,
/// joined with `<br>`.
pub fn description_to_html(raw: &str) -> String {
    clean_description(raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
