//! Newline-delimited JSON job intake

use ctbridge_core::{Error, Result};
use ctbridge_engine::{Job, JobQueue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;

/// Lines read from the input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntakeSummary {
    pub queued: usize,
    pub malformed: usize,
}

/// Queue one job per non-blank line; lines that are not a job are logged and counted
pub async fn feed_jobs<R>(reader: R, queue: &JobQueue) -> Result<IntakeSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = IntakeSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::InvalidData(format!("reading jobs: {}", e)))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Job>(line) {
            Ok(job) => {
                queue.enqueue(job).await?;
                summary.queued += 1;
            }
            Err(e) => {
                error!("Skipping malformed job line: {}", e);
                summary.malformed += 1;
            }
        }
    }

    Ok(summary)
}
