use crate::entities::{LegacyDraftCandidate, NewLegacyJob};
use anyhow::Result;
use sqlx::PgPool;

/// Repository over the older `java_jobs` table. Same insert-or-ignore
/// contract on `jd_hash` as `jobs_v2`.
#[derive(Clone)]
pub struct LegacyJobRepository {
    pool: PgPool,
}

impl LegacyJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_job(&self, job: &NewLegacyJob) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO java_jobs
                  (job_title, vendor_name, vendor_email, vendor_phone, job_location,
                   job_description_html, job_description_text, source_url, jd_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (jd_hash) DO NOTHING
            "#,
        )
        .bind(&job.title)
        .bind(&job.vendor_name)
        .bind(&job.vendor_email)
        .bind(&job.vendor_phone)
        .bind(&job.location)
        .bind(&job.description_html)
        .bind(&job.description_text)
        .bind(&job.source_url)
        .bind(&job.content_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest undrafted rows first.
    pub async fn fetch_jobs_without_drafts(&self, limit: i64) -> Result<Vec<LegacyDraftCandidate>> {
        let rows = sqlx::query_as::<_, LegacyDraftCandidate>(
            r#"
            SELECT id, job_title, vendor_email, job_description_html
            FROM java_jobs
            WHERE email_draft_created = false
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_job_as_drafted(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE java_jobs SET email_draft_created = true WHERE id = $1 AND email_draft_created = false",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
