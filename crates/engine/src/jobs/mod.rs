//! Job records and the handler registry

mod registry;

pub use registry::*;

use serde::{Deserialize, Serialize};

/// A unit of background work
///
/// `data` is free-form; the worker only reads `data.shop` to pick the
/// session the job runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub attempts_made: u32,
}

impl Job {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            attempts_made: 0,
        }
    }

    /// Target shop domain, if the payload names a non-empty one
    pub fn shop(&self) -> Option<&str> {
        self.data
            .get("shop")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Which branch of dispatch a job took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// No shop in the payload; nothing ran
    Dropped,
    /// No handler registered under the job name
    Unhandled,
    /// The handler ran and returned success
    Completed,
}
