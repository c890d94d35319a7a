use anyhow::{Context, Result};
use jobscout::{
    config::Config,
    db,
    drafts::{DraftRunner, GmailDraftClient},
    logging,
    repositories::JobRepository,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::from_env()?;
    let token = config
        .draft
        .gmail_access_token
        .clone()
        .context("GMAIL_ACCESS_TOKEN must be set to create drafts")?;

    let pool = db::connect(&config.database).await?;
    let repo = Arc::new(JobRepository::new(pool.clone()));
    let gmail = Arc::new(GmailDraftClient::new(&config.draft.gmail_api_base, token)?);

    let runner = DraftRunner::new(repo, gmail, config.draft.profile, config.draft.cc_email);
    let summary = runner.run(config.draft.max_drafts).await?;

    println!("{summary}");

    pool.close().await;
    Ok(())
}
