//! Application state management

use bioanno_annotator::Annotator;
use bioanno_core::config::AppConfig;
use bioanno_core::{IndexRegistry, NamespaceTable, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// The annotation orchestrator with its per-type lookup clients
    pub annotator: Annotator,
    /// Per-index query configuration, exposed read-only
    pub indexes: IndexRegistry,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state backed by the live lookup services.
    pub fn new(config: AppConfig) -> Result<Self> {
        let table = Arc::new(NamespaceTable::biolink_defaults());
        let annotator = Annotator::from_config(&config.lookup, table)?;
        Ok(Self::with_annotator(config, annotator))
    }

    /// Create application state around a prebuilt annotator. Tests use
    /// this to substitute scripted lookup clients.
    pub fn with_annotator(config: AppConfig, annotator: Annotator) -> Self {
        Self {
            config,
            annotator,
            indexes: IndexRegistry::pending_defaults(),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
