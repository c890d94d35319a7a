use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::repositories::hash::content_hash;

/// A posting ready to be stored. The hash is derived from the description,
/// so two postings with the same (case-insensitive) text are the same posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub location: String,
    pub vendor_name: String,
    pub vendor_email: Option<String>,
    pub description_text: String,
    pub source_url: String,
    pub content_hash: String,
}

impl NewJobPosting {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        vendor_name: impl Into<String>,
        vendor_email: Option<String>,
        description_text: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        let description_text = description_text.into();
        Self {
            title: title.into(),
            location: location.into(),
            vendor_name: vendor_name.into(),
            vendor_email,
            content_hash: content_hash(&description_text),
            description_text,
            source_url: source_url.into(),
        }
    }
}

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct JobPosting {
    pub id: i64,
    #[sqlx(rename = "job_title")]
    pub title: String,
    #[sqlx(rename = "job_location")]
    pub location: String,
    pub vendor_name: String,
    pub vendor_email: Option<String>,
    #[sqlx(rename = "job_description_text")]
    pub description_text: String,
    pub source_url: String,
    #[sqlx(rename = "jd_hash")]
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "email_draft_created")]
    pub draft_created: bool,
}

/// Row of the older `java_jobs` table, which also kept the page HTML and a
/// phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLegacyJob {
    pub title: String,
    pub vendor_name: String,
    pub vendor_email: Option<String>,
    pub vendor_phone: Option<String>,
    pub location: String,
    pub description_html: Option<String>,
    pub description_text: String,
    pub source_url: String,
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LegacyDraftCandidate {
    pub id: i64,
    #[sqlx(rename = "job_title")]
    pub title: String,
    pub vendor_email: Option<String>,
    #[sqlx(rename = "job_description_html")]
    pub description_html: Option<String>,
}
