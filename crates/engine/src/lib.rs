//! CT Bridge Engine - Background job dispatch for Shopify shops

pub mod executor;
pub mod jobs;

pub use executor::{JobQueue, RunSummary, Worker};
pub use jobs::{HandlerRegistry, Job, JobHandler, JobOutcome};
