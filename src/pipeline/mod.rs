//! One scrape run: fetch the listing, walk its rows in order, store what
//! qualifies.

pub mod summary;

pub use summary::{RowOutcome, RunSummary, SkipReason};

use crate::{
    classifier::{JobClassifier, is_recent_post},
    config::ScrapeConfig,
    dedup::RunDeduplicator,
    entities::NewJobPosting,
    extractor::{ListingRow, ParseError, parse_detail, parse_listing},
    fetcher::{DETAIL_TIMEOUT, FetchClient, FetchError, LISTING_TIMEOUT},
    normalize::normalize_title,
    repositories::JobRepositoryTrait,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

const TOP_DUPLICATES: usize = 10;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("listing fetch failed: {0}")]
    Listing(#[from] FetchError),

    #[error("listing parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("storage failed: {0}")]
    Storage(#[source] anyhow::Error),
}

pub struct ScrapePipeline {
    fetcher: FetchClient,
    repo: Arc<dyn JobRepositoryTrait>,
    classifier: JobClassifier,
    config: ScrapeConfig,
}

impl ScrapePipeline {
    pub fn new(
        fetcher: FetchClient,
        repo: Arc<dyn JobRepositoryTrait>,
        classifier: JobClassifier,
        config: ScrapeConfig,
    ) -> Self {
        Self {
            fetcher,
            repo,
            classifier,
            config,
        }
    }

    /// Run once. Listing fetch/parse failures and storage failures abort the
    /// run; a failing detail page only skips its row.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        info!(search = %self.config.search_text, url = %self.config.search_url, "Fetching listing");
        let page = self
            .fetcher
            .post_form(
                &self.config.search_url,
                &[("txtSearch", self.config.search_text.as_str())],
                LISTING_TIMEOUT,
            )
            .await?;

        let listing = parse_listing(&page.body_utf8, &self.config.site_base_url)?;
        info!(total = listing.total_rows, "Listing parsed");

        let mut summary = RunSummary::new(listing.total_rows);
        let mut dedup = RunDeduplicator::new();

        for row in listing.rows.into_iter().flatten() {
            let span = info_span!("row", url = %row.detail_url);
            let outcome = self
                .process_row(&row, &mut dedup)
                .instrument(span)
                .await?;
            summary.record(&outcome);

            if matches!(outcome, RowOutcome::Stored { .. }) && !self.config.store_pause.is_zero() {
                tokio::time::sleep(self.config.store_pause).await;
            }
        }

        summary.top_duplicates = dedup.top_duplicates(TOP_DUPLICATES);
        Ok(summary)
    }

    /// Filter, fetch, dedup and store a single row.
    pub async fn process_row(
        &self,
        row: &ListingRow,
        dedup: &mut RunDeduplicator,
    ) -> Result<RowOutcome, PipelineError> {
        let title = normalize_title(&row.raw_title);

        if self.config.recent_only && !is_recent_post(&row.posted) {
            debug!(%title, posted = %row.posted, "Skipped: not recent");
            return Ok(RowOutcome::Skipped(SkipReason::Stale));
        }

        if !self.classifier.quick_title_filter(&title) {
            debug!(%title, "Skipped: title has no keyword");
            return Ok(RowOutcome::Skipped(SkipReason::TitleMismatch));
        }

        let page = match self
            .fetcher
            .get(row.detail_url.as_str(), DETAIL_TIMEOUT)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%title, error = %e, "Skipped: detail fetch failed");
                return Ok(RowOutcome::Skipped(SkipReason::FetchFailed(e.to_string())));
            }
        };

        let Some(detail) = parse_detail(&page.body_utf8, &self.config.blocked_email_domains)
        else {
            debug!(%title, "Skipped: thin description");
            return Ok(RowOutcome::Skipped(SkipReason::ThinDescription));
        };

        if !self.classifier.is_in_scope(&title, &detail.description) {
            debug!(%title, "Skipped: out of scope");
            return Ok(RowOutcome::Skipped(SkipReason::OutOfScope));
        }

        if let Some(email) = detail.vendor_email.as_deref()
            && dedup.seen(Some(email))
        {
            info!(
                %title,
                email,
                repeats = dedup.duplicate_count(email),
                "Skipped: vendor already seen this run"
            );
            return Ok(RowOutcome::Skipped(SkipReason::Duplicate));
        }

        let posting = NewJobPosting::new(
            title,
            row.location.clone(),
            row.vendor.clone(),
            detail.vendor_email,
            detail.description,
            row.detail_url.to_string(),
        );

        let inserted = self
            .repo
            .upsert_posting(&posting)
            .await
            .map_err(PipelineError::Storage)?;

        info!(
            title = %posting.title,
            email = ?posting.vendor_email,
            inserted,
            "Stored"
        );
        Ok(RowOutcome::Stored { inserted })
    }
}
