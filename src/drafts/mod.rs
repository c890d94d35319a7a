//! Outreach drafts for stored postings.

pub mod gmail;
pub mod runner;
pub mod template;

pub use gmail::GmailDraftClient;
pub use runner::{DraftRunner, DraftSummary};
pub use template::render_draft;

use async_trait::async_trait;
use thiserror::Error;

/// A draft ready to hand to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftMessage {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub html_body: String,
}

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("draft has no recipient")]
    MissingRecipient,

    #[error("draft service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("draft service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected draft service response: {0}")]
    InvalidResponse(String),
}

/// Provider that stores a message as a draft. Returns the provider's draft id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftService: Send + Sync {
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, DraftError>;
}
