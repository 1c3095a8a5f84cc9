//! Bounded in-process job queue

use crate::jobs::Job;
use ctbridge_core::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Producer side of the queue
///
/// Clones share the channel and the id counter. The worker stops once every
/// clone is dropped and the backlog is drained.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
    next_id: Arc<AtomicU64>,
}

impl JobQueue {
    /// Create a queue holding at most `capacity` pending jobs
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let queue = Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (queue, rx)
    }

    /// Queue a job, waiting while the queue is full
    ///
    /// Jobs without an id get the next sequence number. Returns the id.
    pub async fn enqueue(&self, mut job: Job) -> Result<String> {
        if job.id.is_empty() {
            job.id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        }
        let id = job.id.clone();
        debug!("Queueing job {} ({})", id, job.name);

        self.tx.send(job).await.map_err(|_| Error::QueueClosed)?;
        Ok(id)
    }

    /// Queue a new job by name and payload
    pub async fn add(&self, name: impl Into<String>, data: serde_json::Value) -> Result<String> {
        self.enqueue(Job::new(String::new(), name, data)).await
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
