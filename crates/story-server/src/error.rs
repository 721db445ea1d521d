//! Server errors

use std::net::SocketAddr;
use story_store::StoreError;

/// Errors that end the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Store failed to open or to flush on shutdown
    #[error("project store: {0}")]
    Store(#[from] StoreError),

    /// Listener could not be bound
    #[error("cannot bind {addr}: {message}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Bind failure
        message: String,
    },
}
