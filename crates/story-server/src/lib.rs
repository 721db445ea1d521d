//! HTTP API over the project store
//!
//! | Method | Path                 | Success               | Failure                  |
//! |--------|----------------------|-----------------------|--------------------------|
//! | POST   | `/api/projects`      | 201 + stored project  | 400 bad body, 500 store  |
//! | GET    | `/api/projects`      | 200 + project array   | 500 store                |
//! | GET    | `/api/projects/{id}` | 200 + project         | 404 missing, 500 store   |
//!
//! Every failure body is `{"error": ..., "details": ...}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use story_server::{serve, ServerConfig};
//!
//! serve(ServerConfig::from_env(), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::{routes, ErrorBody};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use story_store::ProjectStore;
use tracing::{error, info};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open the store, serve until `shutdown` resolves, then stop the store
///
/// # Errors
/// - `ServerError::Store` if the snapshot cannot be loaded or the final
///   flush fails
/// - `ServerError::Bind` if the port cannot be bound
pub async fn serve<S>(config: ServerConfig, shutdown: S) -> Result<(), ServerError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let store = Arc::new(ProjectStore::open(config.store.clone())?);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let bound = warp::serve(routes(store.clone())).try_bind_with_graceful_shutdown(addr, shutdown);
    let (addr, server) = match bound {
        Ok(bound) => bound,
        Err(e) => {
            if let Err(stop_err) = store.stop().await {
                error!(error = %stop_err, "final flush failed");
            }
            return Err(ServerError::Bind {
                addr,
                message: e.to_string(),
            });
        }
    };

    info!(%addr, data_file = %store.path().display(), "server listening");
    server.await;
    info!("shutting down");

    store.stop().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_store::StoreConfig;

    #[tokio::test]
    async fn serve_stops_store_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        let config = ServerConfig::default()
            .with_port(0)
            .with_store(StoreConfig::new(&path));

        serve(config, async {}).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), "[]");
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "{broken").unwrap();

        let config = ServerConfig::default()
            .with_port(0)
            .with_store(StoreConfig::new(&path));
        let err = serve(config, async {}).await.unwrap_err();
        assert!(matches!(err, ServerError::Store(_)));
    }
}
