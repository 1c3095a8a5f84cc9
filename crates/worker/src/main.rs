//! CT Bridge Worker - Runs queued shop jobs read from stdin
//!
//! Each input line is one JSON job: `{"name": "...", "data": {"shop": "..."}}`.
//! The worker exits once stdin closes and every queued job has finished.

mod config;
mod handlers;
mod intake;

use anyhow::Context;
use config::WorkerConfig;
use ctbridge_engine::{JobQueue, Worker};
use ctbridge_networking::{CrowdTwistClient, CrowdTwistConfig};
use ctbridge_persistence::{Database, SqliteSessionStore, TokenEncryptor};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ctbridge_worker=debug,ctbridge_engine=debug,ctbridge_networking=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CT Bridge worker");

    let config = WorkerConfig::from_env().context("invalid worker configuration")?;

    let db = Database::connect(&config.database_path)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let encryptor = TokenEncryptor::from_passphrase(&config.encryption_key)?;
    let sessions = SqliteSessionStore::new(db, encryptor);

    let crowdtwist = match CrowdTwistConfig::from_env() {
        Ok(ct) => Some(CrowdTwistClient::new(&ct)?),
        Err(e) => {
            tracing::warn!("CrowdTwist handlers disabled: {}", e);
            None
        }
    };

    let worker = Worker::new(Arc::new(sessions), handlers::default_registry(crowdtwist))
        .with_api_version(config.api_version.clone())
        .with_concurrency(config.concurrency);

    let (queue, jobs) = JobQueue::bounded(config.queue_capacity);
    let running = tokio::spawn(async move { worker.run(jobs).await });

    let intake = intake::feed_jobs(BufReader::new(tokio::io::stdin()), &queue).await?;
    drop(queue);
    tracing::info!(
        "Input closed: {} jobs queued, {} malformed lines",
        intake.queued,
        intake.malformed
    );

    let summary = running.await.context("worker task panicked")?;
    let failed = summary.failed + intake.malformed;
    if failed > 0 {
        anyhow::bail!(
            "{} of {} jobs failed ({} malformed input lines)",
            failed,
            summary.total() + intake.malformed,
            intake.malformed
        );
    }
    Ok(())
}
