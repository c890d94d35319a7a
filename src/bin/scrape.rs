use anyhow::Result;
use jobscout::{
    classifier::JobClassifier,
    config::Config,
    db,
    fetcher::{FetchClient, RetryPolicy},
    logging,
    pipeline::ScrapePipeline,
    repositories::{InMemoryJobRepository, JobRepository, JobRepositoryTrait},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::from_env()?;
    // --dry-run keeps everything in memory and never touches the database
    let dry_run = std::env::args().any(|arg| arg == "--dry-run");

    let pool = if dry_run {
        None
    } else {
        Some(db::connect(&config.database).await?)
    };
    let repo: Arc<dyn JobRepositoryTrait> = match &pool {
        Some(pool) => Arc::new(JobRepository::new(pool.clone())),
        None => {
            info!("Dry run: postings are not persisted");
            Arc::new(InMemoryJobRepository::new())
        }
    };

    let fetcher = FetchClient::new(RetryPolicy::default())?;
    let pipeline = ScrapePipeline::new(fetcher, repo, JobClassifier::default(), config.scrape);
    let summary = pipeline.run().await?;

    println!("{summary}");

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}
