//! Per-job dispatch: shop, session, Admin client, handler

use crate::jobs::{HandlerRegistry, Job, JobOutcome};
use ctbridge_core::{Error, Result};
use ctbridge_networking::{shopify::DEFAULT_API_VERSION, AdminClient};
use ctbridge_persistence::SessionStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Counts of how the jobs seen by [`Worker::run`] ended
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub unhandled: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, result: &Result<JobOutcome>) {
        match result {
            Ok(JobOutcome::Completed) => self.completed += 1,
            Ok(JobOutcome::Unhandled) => self.unhandled += 1,
            Ok(JobOutcome::Dropped) => self.dropped += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.completed + self.unhandled + self.dropped + self.failed
    }
}

/// Dispatches jobs to registered handlers under the shop's stored session
#[derive(Clone)]
pub struct Worker {
    sessions: Arc<dyn SessionStore>,
    registry: Arc<HandlerRegistry>,
    api_version: String,
    concurrency: usize,
}

impl Worker {
    pub fn new(sessions: Arc<dyn SessionStore>, registry: HandlerRegistry) -> Self {
        Self {
            sessions,
            registry: Arc::new(registry),
            api_version: DEFAULT_API_VERSION.to_string(),
            concurrency: 1,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Jobs processed at once by [`run`](Self::run); at least one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one job through dispatch
    ///
    /// A job without a shop is dropped and a job whose name has no handler
    /// is skipped with a warning; both succeed. A shop without a usable
    /// session fails before any handler runs. Handler errors propagate.
    #[instrument(skip_all, fields(job_id = %job.id, job_name = %job.name))]
    pub async fn process_job(&self, job: &Job) -> Result<JobOutcome> {
        info!("Processing job (attempt {})", job.attempts_made + 1);

        let Some(shop) = job.shop() else {
            debug!("Job has no shop, dropping");
            return Ok(JobOutcome::Dropped);
        };

        let session = self
            .sessions
            .find_by_shop(shop)
            .await?
            .filter(|session| session.usable_token().is_some())
            .ok_or_else(|| Error::SessionNotFound(shop.to_string()))?;

        let admin = AdminClient::new(&session, &self.api_version)?;

        let Some(handler) = self.registry.get(&job.name) else {
            warn!("No handler found for job type: {}", job.name);
            return Ok(JobOutcome::Unhandled);
        };

        handler.handle(job, &admin).await?;
        debug!("Job completed for {}", shop);
        Ok(JobOutcome::Completed)
    }

    /// Process jobs until every queue sender is dropped and the backlog is done
    ///
    /// Failures are logged and counted; they never stop the loop.
    pub async fn run(&self, mut jobs: mpsc::Receiver<Job>) -> RunSummary {
        info!("Worker started with concurrency {}", self.concurrency);
        let mut summary = RunSummary::default();
        let mut tasks = JoinSet::new();

        while let Some(job) = jobs.recv().await {
            while tasks.len() >= self.concurrency {
                match tasks.join_next().await {
                    Some(joined) => Self::reap(&mut summary, joined),
                    None => break,
                }
            }

            let worker = self.clone();
            tasks.spawn(async move {
                let result = worker.process_job(&job).await;
                if let Err(e) = &result {
                    error!("Job {} ({}) failed: {}", job.id, job.name, e);
                }
                result
            });
        }

        while let Some(joined) = tasks.join_next().await {
            Self::reap(&mut summary, joined);
        }

        info!(
            "Worker stopped: {} completed, {} unhandled, {} dropped, {} failed",
            summary.completed, summary.unhandled, summary.dropped, summary.failed
        );
        summary
    }

    fn reap(
        summary: &mut RunSummary,
        joined: std::result::Result<Result<JobOutcome>, tokio::task::JoinError>,
    ) {
        match joined {
            Ok(result) => summary.record(&result),
            Err(e) => {
                error!("Job task panicked: {}", e);
                summary.failed += 1;
            }
        }
    }
}
