use crate::entities::{JobPosting, NewJobPosting};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

/// Storage for scraped postings. Implementations must treat a repeated
/// `content_hash` as a silent no-op and commit each write on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepositoryTrait: Send + Sync {
    /// Insert unless a posting with the same hash exists. Returns `true` when
    /// a row was written.
    async fn upsert_posting(&self, posting: &NewJobPosting) -> Result<bool>;

    /// Oldest postings without a draft, at most `limit` of them.
    async fn list_undrafted(&self, limit: i64) -> Result<Vec<JobPosting>>;

    /// Flag one posting as drafted. Returns `false` when it does not exist or
    /// was already drafted.
    async fn mark_drafted(&self, id: i64) -> Result<bool>;
}

/// Postgres-backed repository over the `jobs_v2` table.
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_hash(&self, content_hash: &str) -> Result<Option<JobPosting>> {
        let posting = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT id, job_title, job_location, vendor_name, vendor_email,
                   job_description_text, source_url, jd_hash, created_at,
                   email_draft_created
            FROM jobs_v2
            WHERE jd_hash = $1
            "#,
        )
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(posting)
    }
}

#[async_trait]
impl JobRepositoryTrait for JobRepository {
    async fn upsert_posting(&self, posting: &NewJobPosting) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs_v2
                  (job_title, job_location, vendor_name, vendor_email,
                   job_description_text, source_url, jd_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (jd_hash) DO NOTHING
            "#,
        )
        .bind(&posting.title)
        .bind(&posting.location)
        .bind(&posting.vendor_name)
        .bind(&posting.vendor_email)
        .bind(&posting.description_text)
        .bind(&posting.source_url)
        .bind(&posting.content_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_undrafted(&self, limit: i64) -> Result<Vec<JobPosting>> {
        let postings = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT id, job_title, job_location, vendor_name, vendor_email,
                   job_description_text, source_url, jd_hash, created_at,
                   email_draft_created
            FROM jobs_v2
            WHERE email_draft_created = false
            ORDER BY created_at, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(postings)
    }

    async fn mark_drafted(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs_v2
            SET email_draft_created = true
            WHERE id = $1 AND email_draft_created = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
