//! HTTP endpoints. Each sub-module owns one `/api/...` scope and exposes it
//! through `configure_routes`.
//!
//! Handlers stay thin: they read the request, run the store or import work
//! on the blocking pool with a connection of their own, and shape the reply.

pub mod donnees;
pub mod enquete;
pub mod enqueteurs;
mod error;
pub mod files;

pub use error::ServiceError;

use rusqlite::Connection;

use crate::config::Config;
use crate::store;

/// Runs `work` on the blocking thread pool against a freshly opened store.
pub(crate) async fn with_store<T, F>(config: &Config, work: F) -> Result<T, ServiceError>
where
    F: FnOnce(&mut Connection) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let database = config.database.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = store::open(&database)?;
        work(&mut conn)
    })
    .await?
}
