//! Vendor contact addresses on a job detail page.
//!
//! The board hides most addresses behind a per-element XOR cipher: the
//! element carries a hex string in `data-cfemail` whose first byte is the
//! key and whose remaining bytes are the address XOR'd with it. Pages that
//! skip the cipher carry the address as plain text.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static OBFUSCATED_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-cfemail]").unwrap());

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmailDecodeError {
    #[error("encoded email is empty")]
    Empty,

    #[error("encoded email has odd length {0}")]
    OddLength(usize),

    #[error("invalid hex at offset {0}")]
    InvalidHex(usize),
}

/// Decode one `data-cfemail` payload.
pub fn decode_obfuscated(encoded: &str) -> Result<String, EmailDecodeError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(EmailDecodeError::Empty);
    }
    if encoded.len() % 2 != 0 {
        return Err(EmailDecodeError::OddLength(encoded.len()));
    }

    let key = hex_byte(encoded, 0)?;
    (2..encoded.len())
        .step_by(2)
        .map(|offset| hex_byte(encoded, offset).map(|b| char::from(b ^ key)))
        .collect()
}

fn hex_byte(encoded: &str, offset: usize) -> Result<u8, EmailDecodeError> {
    encoded
        .get(offset..offset + 2)
        .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        .ok_or(EmailDecodeError::InvalidHex(offset))
}

/// Decoded addresses from every obfuscated element. Elements that fail to
/// decode are skipped.
pub fn obfuscated_emails(document: &Html) -> BTreeSet<String> {
    document
        .select(&OBFUSCATED_SELECTOR)
        .filter_map(|el| el.value().attr("data-cfemail"))
        .filter_map(|encoded| match decode_obfuscated(encoded) {
            Ok(email) => Some(email),
            Err(e) => {
                debug!(encoded, error = %e, "Skipping undecodable email");
                None
            }
        })
        .collect()
}

/// Addresses written out in plain text.
pub fn plain_text_emails(text: &str) -> BTreeSet<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lower-case, de-duplicate and drop addresses under any of `blocked_domains`.
/// Returns `None` when nothing usable is left.
pub fn filter_vendor_emails<I, S>(candidates: I, blocked_domains: &[String]) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let valid: BTreeSet<String> = candidates
        .into_iter()
        .map(|e| e.as_ref().trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .filter(|e| !is_blocked(e, blocked_domains))
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid.into_iter().collect::<Vec<_>>().join(", "))
    }
}

fn is_blocked(email: &str, blocked_domains: &[String]) -> bool {
    blocked_domains
        .iter()
        .any(|domain| email.ends_with(&format!("@{domain}")))
}

/// Contact addresses for a parsed detail page: obfuscated ones when any
/// decode, otherwise a scan of the page text, then host filtering.
pub fn extract_vendor_email(
    document: &Html,
    page_text: &str,
    blocked_domains: &[String],
) -> Option<String> {
    let mut candidates = obfuscated_emails(document);
    if candidates.is_empty() {
        candidates = plain_text_emails(page_text);
    }
    filter_vendor_emails(candidates, blocked_domains)
}
