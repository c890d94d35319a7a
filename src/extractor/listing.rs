use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

pub const UNKNOWN_VENDOR: &str = "Unknown";

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"table[border="1"]"#).unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("listing page has no results table")]
    MissingTable,

    #[error("invalid site base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// One usable row of the search results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Title cell text as shown, not yet normalized.
    pub raw_title: String,
    pub location: String,
    pub posted: String,
    pub vendor: String,
    pub detail_url: Url,
}

/// Parsed search results.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Every `<tr>` in the table, header and malformed rows included.
    pub total_rows: usize,
    /// `None` where a row lacks a link, cells, or a resolvable href.
    pub rows: Vec<Option<ListingRow>>,
}

pub fn parse_listing(html: &str, site_base_url: &str) -> Result<Listing, ParseError> {
    let base = Url::parse(site_base_url)?;
    let document = Html::parse_document(html);

    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or(ParseError::MissingTable)?;

    let rows: Vec<Option<ListingRow>> = table
        .select(&ROW_SELECTOR)
        .map(|row| parse_row(row, &base))
        .collect();

    Ok(Listing {
        total_rows: rows.len(),
        rows,
    })
}

fn parse_row(row: ElementRef<'_>, base: &Url) -> Option<ListingRow> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
    let href = row.select(&LINK_SELECTOR).next()?.value().attr("href")?;

    if cells.len() < 3 {
        return None;
    }

    Some(ListingRow {
        raw_title: spaced_text(cells[0]),
        location: joined_text(cells[1]),
        posted: joined_text(cells[2]),
        vendor: cells
            .get(3)
            .map(|cell| joined_text(*cell))
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_string()),
        detail_url: base.join(href.trim()).ok()?,
    })
}

/// Words of all text nodes joined by single spaces.
fn spaced_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text nodes concatenated.
fn joined_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}
