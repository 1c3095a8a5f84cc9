//! Name-to-handler lookup table

use super::Job;
use async_trait::async_trait;
use ctbridge_core::Result;
use ctbridge_networking::AdminClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Work performed for one job name
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job, admin: &AdminClient) -> Result<()>;
}

/// Handlers keyed by job name, populated at startup and read-only afterwards
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, handler: impl JobHandler + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, handler: impl JobHandler + 'static) -> Self {
        self.register(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
