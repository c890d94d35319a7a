use crate::entities::{JobPosting, NewJobPosting};
use crate::repositories::JobRepositoryTrait;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

/// Process-local repository with the same contract as the Postgres one.
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    rows: Mutex<Vec<JobPosting>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored posting in insertion order.
    pub fn snapshot(&self) -> Vec<JobPosting> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl JobRepositoryTrait for InMemoryJobRepository {
    async fn upsert_posting(&self, posting: &NewJobPosting) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| anyhow!("repository lock poisoned"))?;
        if rows.iter().any(|r| r.content_hash == posting.content_hash) {
            return Ok(false);
        }

        let id = rows.len() as i64 + 1;
        rows.push(JobPosting {
            id,
            title: posting.title.clone(),
            location: posting.location.clone(),
            vendor_name: posting.vendor_name.clone(),
            vendor_email: posting.vendor_email.clone(),
            description_text: posting.description_text.clone(),
            source_url: posting.source_url.clone(),
            content_hash: posting.content_hash.clone(),
            created_at: Utc::now(),
            draft_created: false,
        });
        Ok(true)
    }

    async fn list_undrafted(&self, limit: i64) -> Result<Vec<JobPosting>> {
        let rows = self.rows.lock().map_err(|_| anyhow!("repository lock poisoned"))?;
        let mut pending: Vec<JobPosting> = rows.iter().filter(|r| !r.draft_created).cloned().collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        pending.truncate(limit.max(0) as usize);
        Ok(pending)
    }

    async fn mark_drafted(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| anyhow!("repository lock poisoned"))?;
        match rows.iter_mut().find(|r| r.id == id && !r.draft_created) {
            Some(row) => {
                row.draft_created = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, description: &str) -> NewJobPosting {
        NewJobPosting::new(
            title,
            "Remote",
            "Acme",
            Some("hr@acme.com".to_string()),
            description,
            format!("https://board.example/{title}"),
        )
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_description() {
        let repo = InMemoryJobRepository::new();
        assert!(repo.upsert_posting(&posting("one", "Java role")).await.unwrap());
        assert!(!repo.upsert_posting(&posting("two", "JAVA ROLE")).await.unwrap());
        assert_eq!(repo.snapshot().len(), 1);
        assert_eq!(repo.snapshot()[0].title, "one");
    }

    #[tokio::test]
    async fn test_list_and_mark_drafted() {
        let repo = InMemoryJobRepository::new();
        for (i, title) in ["a", "b", "c"].iter().enumerate() {
            repo.upsert_posting(&posting(title, &format!("desc {i}")))
                .await
                .unwrap();
        }

        let batch = repo.list_undrafted(2).await.unwrap();
        assert_eq!(
            batch.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );

        assert!(repo.mark_drafted(batch[0].id).await.unwrap());
        assert!(!repo.mark_drafted(batch[0].id).await.unwrap());
        assert!(!repo.mark_drafted(99).await.unwrap());

        let remaining = repo.list_undrafted(10).await.unwrap();
        assert_eq!(
            remaining.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        assert!(repo.list_undrafted(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_survives_poisoned_lock() {
        let repo = InMemoryJobRepository::new();
        repo.upsert_posting(&posting("a", "Java role")).await.unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = repo.rows.lock().unwrap();
            panic!("writer died holding the lock");
        }));

        assert_eq!(repo.snapshot().len(), 1);
        assert!(repo.list_undrafted(10).await.is_err());
    }
}
