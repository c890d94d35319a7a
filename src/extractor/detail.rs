use crate::extractor::email::extract_vendor_email;
use scraper::Html;

/// Pages with less text than this carry no real job description.
pub const MIN_DESCRIPTION_CHARS: usize = 150;

const SKIPPED_PARENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetail {
    /// Page text, one trimmed text node per line.
    pub description: String,
    pub vendor_email: Option<String>,
}

/// Parse a detail page. `None` when the page is too thin to be a posting.
pub fn parse_detail(html: &str, blocked_domains: &[String]) -> Option<JobDetail> {
    let document = Html::parse_document(html);

    let description = page_text(&document);
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return None;
    }

    Some(JobDetail {
        vendor_email: extract_vendor_email(&document, &description, blocked_domains),
        description,
    })
}

/// Every visible, non-blank text node trimmed and joined with newlines.
pub fn page_text(document: &Html) -> String {
    document
        .tree
        .nodes()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .is_some_and(|name| SKIPPED_PARENTS.contains(&name));
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
