//! Which postings are worth keeping.
//!
//! Matching is plain case-insensitive substring containment, so "java" also
//! matches "javascript" and "lead" matches "leadership".

use regex::Regex;
use std::sync::LazyLock;

pub const INCLUDED_KEYWORDS: [&str; 5] = [
    "java",
    "java full stack",
    "full stack java",
    "spring boot",
    "java developer",
];

pub const EXCLUDED_TITLE_KEYWORDS: [&str; 4] = [
    "lead",
    "architect",
    "solutions architect",
    "principal architect",
];

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Keyword sets used to decide scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobClassifier {
    included: Vec<String>,
    excluded_title: Vec<String>,
}

impl Default for JobClassifier {
    fn default() -> Self {
        Self::new(INCLUDED_KEYWORDS, EXCLUDED_TITLE_KEYWORDS)
    }
}

impl JobClassifier {
    pub fn new<I, E, S, T>(included: I, excluded_title: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            included: included
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            excluded_title: excluded_title
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Cheap check before fetching the detail page.
    pub fn quick_title_filter(&self, title: &str) -> bool {
        contains_any(&title.to_lowercase(), &self.included)
    }

    /// Full check once the description is known.
    pub fn is_in_scope(&self, title: &str, description: &str) -> bool {
        let title = title.to_lowercase();
        if contains_any(&title, &self.excluded_title) {
            return false;
        }
        let text = format!("{} {}", title, description.to_lowercase());
        contains_any(&text, &self.included)
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Whether a "posted" label is from the last day or so: "Today", "N hours
/// ago" and "1 day ago" pass, anything older or unrecognised does not.
pub fn is_recent_post(posted: &str) -> bool {
    let text = posted.to_lowercase();
    if text.trim().is_empty() {
        return false;
    }

    if text.contains("today") || text.contains("hour") {
        return true;
    }

    if text.contains("day") {
        return LEADING_NUMBER
            .find(&text)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .is_some_and(|days| days <= 1);
    }

    false
}
