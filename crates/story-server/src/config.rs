//! Server configuration

use story_store::StoreConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen port on all interfaces
    pub port: u16,
    /// Backing store
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// With port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// With store configuration
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Read `PORT` plus the store variables
    ///
    /// An unparsable `PORT` falls back to the default with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PORT, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            _ => DEFAULT_PORT,
        };
        Self {
            port,
            store: StoreConfig::from_env(),
        }
    }
}
