//! Persistence layer — SQLite through SeaORM
//!
//! One database holds the stack-internal key/value table and the request
//! FIFO. Connecting runs the migrations, so a fresh database is usable
//! immediately and an existing one is upgraded in place.

pub mod entities;
pub mod fifo;
pub mod kv;
pub mod migrator;

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

pub use fifo::{DeferredRequest, FifoError, RequestFifo};
pub use kv::InternalKvStore;
use migrator::Migrator;

/// Handle to the stack database.
#[derive(Clone)]
pub struct Storage {
    db: DatabaseConnection,
}

impl Storage {
    /// Connect and migrate. `url` is a SeaORM connection URL, e.g.
    /// `sqlite://ocpp.db?mode=rwc` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, DbErr> {
        let db = Database::connect(url).await?;
        Migrator::up(&db, None).await?;
        info!(url, "Stack database ready");
        Ok(Self { db })
    }

    pub fn kv(&self) -> InternalKvStore {
        InternalKvStore::new(self.db.clone())
    }

    pub fn fifo(&self, capacity: usize) -> RequestFifo {
        RequestFifo::new(self.db.clone(), capacity)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
