//! Stack-internal persistent key/value store
//!
//! Single-table store holding the stack's own configuration and counters
//! (version, uptimes, last connection URL, registration status, …). The
//! stack owns every write; embedders read through the public accessors on
//! the charge point.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseConnection;
use tracing::debug;

use super::entities::internal_config;

// ── Well-known keys ────────────────────────────────────────────

/// Configuration key : stack version
pub const STACK_VERSION_KEY: &str = "StackVersion";
/// Configuration key : last start date
pub const START_DATE_KEY: &str = "LastSessionStartDate";
/// Configuration key : uptime
pub const UPTIME_KEY: &str = "LastSessionUpTime";
/// Configuration key : disconnected time
pub const DISCONNECTED_TIME_KEY: &str = "LastSessionDisconnectedTime";
/// Configuration key : total uptime
pub const TOTAL_UPTIME_KEY: &str = "TotalUpTime";
/// Configuration key : total disconnected time
pub const TOTAL_DISCONNECTED_TIME_KEY: &str = "TotalDisconnectedTime";
/// Configuration key : last connection URL
pub const LAST_CONNECTION_URL_KEY: &str = "LastConnectionUrl";
/// Configuration key : last registration status
pub const LAST_REGISTRATION_STATUS_KEY: &str = "LastRegistrationStatus";
/// Configuration key : local list version
pub const LOCAL_LIST_VERSION_KEY: &str = "LocalListVersion";
/// Configuration key : signed firmware update request id
pub const SIGNED_FW_UPDATE_ID_KEY: &str = "SignedFirmwareUpdateId";

/// Reported stack version, stamped into the store on startup.
pub const STACK_VERSION: &str = concat!("ocpp-stack ", env!("CARGO_PKG_VERSION"));

// ── InternalKvStore ────────────────────────────────────────────

/// Persistent `{key → value}` store over the `internal_config` table.
#[derive(Clone)]
pub struct InternalKvStore {
    db: DatabaseConnection,
}

impl InternalKvStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the well-known keys with their defaults when absent and stamp
    /// the current stack version.
    pub async fn initialize(&self) -> Result<(), DbErr> {
        self.create(START_DATE_KEY, "").await?;
        self.create(UPTIME_KEY, "0").await?;
        self.create(DISCONNECTED_TIME_KEY, "0").await?;
        self.create(TOTAL_UPTIME_KEY, "0").await?;
        self.create(TOTAL_DISCONNECTED_TIME_KEY, "0").await?;
        self.create(LAST_CONNECTION_URL_KEY, "").await?;
        self.create(LAST_REGISTRATION_STATUS_KEY, "Rejected").await?;
        self.create(LOCAL_LIST_VERSION_KEY, "0").await?;
        self.create(SIGNED_FW_UPDATE_ID_KEY, "").await?;
        // Always refreshed, not only created
        self.set(STACK_VERSION_KEY, STACK_VERSION).await?;
        debug!("Internal configuration initialized");
        Ok(())
    }

    pub async fn key_exists(&self, key: &str) -> Result<bool, DbErr> {
        Ok(internal_config::Entity::find_by_id(key)
            .one(&self.db)
            .await?
            .is_some())
    }

    /// Create `key` with `default` unless it already exists.
    pub async fn create(&self, key: &str, default: &str) -> Result<(), DbErr> {
        if self.key_exists(key).await? {
            return Ok(());
        }
        internal_config::ActiveModel {
            key: Set(key.to_string()),
            value: Set(default.to_string()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), DbErr> {
        match internal_config::Entity::find_by_id(key).one(&self.db).await? {
            Some(model) => {
                let mut active: internal_config::ActiveModel = model.into();
                active.value = Set(value.to_string());
                active.update(&self.db).await?;
            }
            None => {
                internal_config::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_string()),
                }
                .insert(&self.db)
                .await?;
            }
        }
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        Ok(internal_config::Entity::find_by_id(key)
            .one(&self.db)
            .await?
            .map(|m| m.value))
    }

    /// Read a numeric counter; unparseable or missing values read as 0.
    pub async fn get_counter(&self, key: &str) -> Result<u64, DbErr> {
        Ok(self
            .get(key)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    pub async fn set_counter(&self, key: &str, value: u64) -> Result<(), DbErr> {
        self.set(key, &value.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    async fn store() -> InternalKvStore {
        Storage::connect("sqlite::memory:").await.unwrap().kv()
    }

    #[tokio::test]
    async fn initialize_creates_well_known_keys() {
        let kv = store().await;
        kv.initialize().await.unwrap();

        assert!(kv.key_exists(UPTIME_KEY).await.unwrap());
        assert_eq!(kv.get(UPTIME_KEY).await.unwrap().as_deref(), Some("0"));
        assert_eq!(
            kv.get(LAST_REGISTRATION_STATUS_KEY).await.unwrap().as_deref(),
            Some("Rejected")
        );
        assert_eq!(
            kv.get(STACK_VERSION_KEY).await.unwrap().as_deref(),
            Some(STACK_VERSION)
        );
    }

    #[tokio::test]
    async fn create_does_not_overwrite() {
        let kv = store().await;
        kv.set(UPTIME_KEY, "1234").await.unwrap();
        kv.create(UPTIME_KEY, "0").await.unwrap();
        assert_eq!(kv.get(UPTIME_KEY).await.unwrap().as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn set_then_get() {
        let kv = store().await;
        kv.set(LAST_CONNECTION_URL_KEY, "ws://example/ocpp/CP-1")
            .await
            .unwrap();
        assert_eq!(
            kv.get(LAST_CONNECTION_URL_KEY).await.unwrap().as_deref(),
            Some("ws://example/ocpp/CP-1")
        );
        // Overwrite
        kv.set(LAST_CONNECTION_URL_KEY, "ws://other/ocpp/CP-1")
            .await
            .unwrap();
        assert_eq!(
            kv.get(LAST_CONNECTION_URL_KEY).await.unwrap().as_deref(),
            Some("ws://other/ocpp/CP-1")
        );
    }

    #[tokio::test]
    async fn counters_parse_and_default() {
        let kv = store().await;
        assert_eq!(kv.get_counter(TOTAL_UPTIME_KEY).await.unwrap(), 0);
        kv.set_counter(TOTAL_UPTIME_KEY, 86400).await.unwrap();
        assert_eq!(kv.get_counter(TOTAL_UPTIME_KEY).await.unwrap(), 86400);

        kv.set(TOTAL_UPTIME_KEY, "garbage").await.unwrap();
        assert_eq!(kv.get_counter(TOTAL_UPTIME_KEY).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_key_reads_none() {
        let kv = store().await;
        assert_eq!(kv.get("NoSuchKey").await.unwrap(), None);
        assert!(!kv.key_exists("NoSuchKey").await.unwrap());
    }
}
