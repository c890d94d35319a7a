use crate::{
    config::ApplicantProfile,
    drafts::{DraftService, render_draft},
    repositories::JobRepositoryTrait,
};
use anyhow::{Context, Result};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSummary {
    pub candidates: usize,
    pub drafted: usize,
    pub skipped_no_email: usize,
    pub failed: usize,
}

impl Display for DraftSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Drafts: {} candidates, {} created, {} skipped (no email), {} failed",
            self.candidates, self.drafted, self.skipped_no_email, self.failed
        )
    }
}

/// Drafts outreach emails for stored postings that have none yet.
pub struct DraftRunner {
    repo: Arc<dyn JobRepositoryTrait>,
    service: Arc<dyn DraftService>,
    profile: ApplicantProfile,
    cc: Option<String>,
}

impl DraftRunner {
    pub fn new(
        repo: Arc<dyn JobRepositoryTrait>,
        service: Arc<dyn DraftService>,
        profile: ApplicantProfile,
        cc: Option<String>,
    ) -> Self {
        Self {
            repo,
            service,
            profile,
            cc,
        }
    }

    /// Draft up to `limit` postings, oldest first. A posting is only marked
    /// drafted after its draft was created; a failed draft leaves it for the
    /// next run.
    pub async fn run(&self, limit: i64) -> Result<DraftSummary> {
        let postings = self
            .repo
            .list_undrafted(limit)
            .await
            .context("failed to list undrafted postings")?;

        let mut summary = DraftSummary {
            candidates: postings.len(),
            ..DraftSummary::default()
        };
        info!(candidates = summary.candidates, "Postings to draft");

        for posting in postings {
            let Some(message) = render_draft(&posting, &self.profile, self.cc.as_deref()) else {
                warn!(id = posting.id, title = %posting.title, "Skipping: no vendor email");
                summary.skipped_no_email += 1;
                continue;
            };

            match self.service.create_draft(&message).await {
                Ok(draft_id) => {
                    self.repo
                        .mark_drafted(posting.id)
                        .await
                        .with_context(|| format!("failed to mark posting {} drafted", posting.id))?;
                    info!(id = posting.id, %draft_id, to = %message.to, "Drafted");
                    summary.drafted += 1;
                }
                Err(e) => {
                    warn!(id = posting.id, title = %posting.title, error = %e, "Draft failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::{DraftError, MockDraftService};
    use crate::entities::JobPosting;
    use crate::repositories::MockJobRepositoryTrait;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn posting(id: i64, email: Option<&str>) -> JobPosting {
        JobPosting {
            id,
            title: format!("Java Developer {id}"),
            location: "Remote".to_string(),
            vendor_name: "Unknown".to_string(),
            vendor_email: email.map(str::to_string),
            description_text: "Java and Spring Boot".to_string(),
            source_url: format!("https://nvoids.com/job_details.jsp?id={id}"),
            content_hash: format!("hash-{id}"),
            created_at: Utc::now(),
            draft_created: false,
        }
    }

    fn runner(repo: MockJobRepositoryTrait, service: MockDraftService) -> DraftRunner {
        DraftRunner::new(
            Arc::new(repo),
            Arc::new(service),
            ApplicantProfile::default(),
            Some("me@example.com".to_string()),
        )
    }

    #[tokio::test]
    async fn test_drafts_and_marks_each_posting() {
        let mut repo = MockJobRepositoryTrait::new();
        repo.expect_list_undrafted()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(vec![posting(1, Some("a@x.com")), posting(2, Some("b@y.com"))]));
        repo.expect_mark_drafted().with(eq(1)).times(1).returning(|_| Ok(true));
        repo.expect_mark_drafted().with(eq(2)).times(1).returning(|_| Ok(true));

        let mut service = MockDraftService::new();
        service
            .expect_create_draft()
            .withf(|m| m.cc.as_deref() == Some("me@example.com") && m.subject.starts_with("Application – "))
            .times(2)
            .returning(|m| Ok(format!("draft-{}", m.to)));

        let summary = runner(repo, service).run(10).await.unwrap();
        assert_eq!(
            summary,
            DraftSummary {
                candidates: 2,
                drafted: 2,
                skipped_no_email: 0,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_no_email_is_skipped_and_not_marked() {
        let mut repo = MockJobRepositoryTrait::new();
        repo.expect_list_undrafted()
            .returning(|_| Ok(vec![posting(1, None), posting(2, Some("b@y.com"))]));
        repo.expect_mark_drafted().with(eq(2)).times(1).returning(|_| Ok(true));

        let mut service = MockDraftService::new();
        service
            .expect_create_draft()
            .withf(|m| m.to == "b@y.com")
            .times(1)
            .returning(|_| Ok("d1".to_string()));

        let summary = runner(repo, service).run(10).await.unwrap();
        assert_eq!(summary.skipped_no_email, 1);
        assert_eq!(summary.drafted, 1);
    }

    #[tokio::test]
    async fn test_failed_draft_continues_batch() {
        let mut repo = MockJobRepositoryTrait::new();
        repo.expect_list_undrafted()
            .returning(|_| Ok(vec![posting(1, Some("a@x.com")), posting(2, Some("b@y.com"))]));
        repo.expect_mark_drafted().with(eq(2)).times(1).returning(|_| Ok(true));

        let mut service = MockDraftService::new();
        service
            .expect_create_draft()
            .withf(|m| m.to == "a@x.com")
            .returning(|_| {
                Err(DraftError::Http {
                    status: 500,
                    body: "boom".to_string(),
                })
            });
        service
            .expect_create_draft()
            .withf(|m| m.to == "b@y.com")
            .returning(|_| Ok("d2".to_string()));

        let summary = runner(repo, service).run(10).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.drafted, 1);
        assert_eq!(
            summary.to_string(),
            "Drafts: 2 candidates, 1 created, 0 skipped (no email), 1 failed"
        );
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let mut repo = MockJobRepositoryTrait::new();
        repo.expect_list_undrafted()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let service = MockDraftService::new();

        let err = runner(repo, service).run(5).await.unwrap_err();
        assert!(err.to_string().contains("undrafted"));
    }
}
