/// Development mode utilities for working with saved feed snapshots
///
/// When live NHC data is unavailable (offline development, a quiet
/// basin, or repeated test runs that should not hammer the feed), use
/// this module to replay a previously saved KMZ snapshot as if it were
/// the live download. The rest of the pipeline — extraction, parsing,
/// analysis, reporting — runs unchanged.

use crate::model::MonitorError;

/// Configuration for feed snapshot replay.
pub struct DevMode {
    /// Path to a saved KMZ snapshot of the NHC feed.
    pub feed_path: String,
}

impl DevMode {
    pub fn new(feed_path: &str) -> Self {
        Self { feed_path: feed_path.to_string() }
    }

    /// Reads the snapshot bytes, standing in for the network fetch.
    /// Failures map to `Fetch`, the same class as the live boundary,
    /// so the caller's error handling is identical in both modes.
    pub fn read_feed(&self) -> Result<Vec<u8>, MonitorError> {
        std::fs::read(&self.feed_path).map_err(|e| {
            MonitorError::Fetch(format!("cannot read feed snapshot '{}': {}", self.feed_path, e))
        })
    }
}
