//! Job queue and worker loop

mod queue;
mod worker;

pub use queue::JobQueue;
pub use worker::{RunSummary, Worker};
