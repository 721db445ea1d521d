//! Store configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default snapshot file
pub const DEFAULT_SNAPSHOT_PATH: &str = "projects.json";

/// Default period between snapshots
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(20);

/// Project store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing snapshot file
    pub snapshot_path: PathBuf,
    /// Period of the background snapshot task
    pub flush_interval: Duration,
}

impl StoreConfig {
    /// Create configuration for a snapshot path
    #[inline]
    #[must_use]
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    /// With flush interval
    #[inline]
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Read `DATA_FILE` and `FLUSH_INTERVAL_SECS` from the environment
    ///
    /// Unset or unparsable values fall back to the defaults. A zero interval
    /// is raised to one second.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var("DATA_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string());

        let interval = std::env::var("FLUSH_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(DEFAULT_FLUSH_INTERVAL, |secs| Duration::from_secs(secs.max(1)));

        Self::new(path).with_flush_interval(interval)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.snapshot_path, PathBuf::from("projects.json"));
        assert_eq!(config.flush_interval, Duration::from_secs(20));
    }

    #[test]
    fn builder() {
        let config = StoreConfig::new("/tmp/x.json").with_flush_interval(Duration::from_secs(5));
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.flush_interval, Duration::from_secs(5));
    }
}
