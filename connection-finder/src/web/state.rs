//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedConnectionFinder};
use crate::query::QueryConfig;
use crate::source::InMemorySchedule;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connection finder over the loaded snapshot, with cached clusters
    /// and services
    pub finder: Arc<CachedConnectionFinder<InMemorySchedule>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(schedule: InMemorySchedule, config: QueryConfig, cache: &CacheConfig) -> Self {
        Self {
            finder: Arc::new(CachedConnectionFinder::new(
                Arc::new(schedule),
                config,
                cache,
            )),
        }
    }

    pub fn schedule(&self) -> &InMemorySchedule {
        self.finder.source()
    }

    pub fn config(&self) -> &QueryConfig {
        self.finder.config()
    }
}
