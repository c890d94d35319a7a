use crate::fetcher::types::{Charset, PageResponse};
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

pub fn decode_page(
    url_final: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, body_bytes);
    let body_utf8 = decode_to_utf8(body_bytes, &charset);

    PageResponse {
        url_final,
        status,
        body_utf8,
        charset,
    }
}

fn label_to_charset(label: &str) -> Option<Charset> {
    Encoding::for_label(label.to_lowercase().as_bytes()).map(Charset::from_encoding)
}

/// Header charset first, then a `<meta>` declaration in the first 4KB, then
/// statistical detection.
fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(charset) = CHARSET_REGEX
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| label_to_charset(m.as_str()))
    {
        return charset;
    }

    // the http-equiv form also ends in `charset=...`, so one pattern covers both
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(charset) = META_CHARSET_REGEX
        .captures(&search_str)
        .and_then(|c| c.get(1))
        .and_then(|m| label_to_charset(m.as_str()))
    {
        return charset;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, body_bytes.len() <= 4096);
    Charset::from_encoding(detector.guess(None, true))
}

/// Malformed sequences become U+FFFD; a stray byte never loses the page.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(encoding = encoding.name(), "Malformed bytes replaced while decoding page");
    }

    decoded.into_owned()
}
