//! Data storage layer
//!
//! Provides database services for the application:
//! - `sqlite` - Transactional database for the catalog and orders
//! - `filters` - Product query builder (search, filter, paginate)
//! - `types` - Shared data types
//! - `traits` - Repository trait used by the API layer
//! - `error` - Unified error type

pub mod error;
pub mod filters;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteService;

pub use error::DataError;

pub use traits::TransactionalRepository;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::storage::AppStorage;

/// Transactional database service
///
/// Owns the SQLite backend and hands out repository trait objects to the
/// API layer. Stored as Arc so background tasks can share it.
pub struct TransactionalService {
    sqlite: Arc<SqliteService>,
}

impl TransactionalService {
    /// Open (and migrate) the database under the storage data directory
    pub async fn init(storage: &AppStorage) -> Result<Self, DataError> {
        let service = SqliteService::init(storage).await?;
        Ok(Self::from_sqlite(Arc::new(service)))
    }

    /// Wrap an already initialized SQLite service
    pub fn from_sqlite(sqlite: Arc<SqliteService>) -> Self {
        Self { sqlite }
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        self.sqlite.checkpoint().await.map_err(Into::into)
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        self.sqlite.close().await
    }

    /// Start the background checkpoint task
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        self.sqlite.start_checkpoint_task(shutdown_rx)
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn TransactionalRepository + Send + Sync> {
        Box::new(Arc::clone(&self.sqlite))
    }
}
