use std::sync::Arc;

use crate::config::Config;
use crate::sequencing::EntityLocks;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Postgres by default; in-memory via STORE_BACKEND.
    pub store: Arc<dyn RecordStore>,
    /// Orders concurrent writes to the same record.
    pub locks: EntityLocks,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self {
            store,
            locks: EntityLocks::new(),
            config,
        }
    }
}
