//! Persistent request FIFO (store-and-forward queue)
//!
//! Buffers station-initiated transactional messages while the session is
//! not Accepted. Entries are durable before `enqueue` returns, survive
//! process restarts in order, and are removed only after the central
//! system acknowledged the replayed call.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::entities::request_fifo;
use crate::messages::QueueOverflowPolicy;

// ── Types ──────────────────────────────────────────────────────

/// One deferred outbound request.
#[derive(Debug, Clone)]
pub struct DeferredRequest {
    pub sequence: i64,
    pub connector_id: i32,
    pub action: String,
    pub payload: Value,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FifoError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Queue is full ({capacity} entries) and {action} must not be dropped")]
    Full { capacity: usize, action: String },

    #[error("Stored payload is not valid JSON: {0}")]
    CorruptPayload(#[from] serde_json::Error),
}

// ── RequestFifo ────────────────────────────────────────────────

/// Durable FIFO over the `request_fifo` table.
#[derive(Clone)]
pub struct RequestFifo {
    db: DatabaseConnection,
    capacity: usize,
}

impl RequestFifo {
    pub fn new(db: DatabaseConnection, capacity: usize) -> Self {
        Self { db, capacity }
    }

    /// Append a request. The row is flushed before this returns; a crash
    /// afterwards preserves the entry.
    ///
    /// On overflow, `policy` decides: `DropOldest` discards the oldest
    /// entry with the same action on the same connector, `Reject` fails.
    pub async fn enqueue(
        &self,
        connector_id: i32,
        action: &str,
        payload: &Value,
        policy: QueueOverflowPolicy,
    ) -> Result<i64, FifoError> {
        if self.len().await? >= self.capacity {
            match policy {
                QueueOverflowPolicy::DropOldest => {
                    let victim = request_fifo::Entity::find()
                        .filter(request_fifo::Column::ConnectorId.eq(connector_id))
                        .filter(request_fifo::Column::Action.eq(action))
                        .order_by_asc(request_fifo::Column::Sequence)
                        .one(&self.db)
                        .await?;
                    match victim {
                        Some(old) => {
                            warn!(
                                action,
                                connector_id,
                                dropped_sequence = old.sequence,
                                "Request FIFO full; dropping oldest entry of same kind"
                            );
                            request_fifo::Entity::delete_by_id(old.sequence)
                                .exec(&self.db)
                                .await?;
                        }
                        None => {
                            return Err(FifoError::Full {
                                capacity: self.capacity,
                                action: action.to_string(),
                            })
                        }
                    }
                }
                QueueOverflowPolicy::Reject => {
                    return Err(FifoError::Full {
                        capacity: self.capacity,
                        action: action.to_string(),
                    })
                }
            }
        }

        let inserted = request_fifo::ActiveModel {
            connector_id: Set(connector_id),
            action: Set(action.to_string()),
            payload: Set(payload.to_string()),
            enqueued_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(
            action,
            connector_id,
            sequence = inserted.sequence,
            "Deferred request enqueued"
        );
        Ok(inserted.sequence)
    }

    /// Oldest entry without removing it.
    pub async fn peek(&self) -> Result<Option<DeferredRequest>, FifoError> {
        let model = request_fifo::Entity::find()
            .order_by_asc(request_fifo::Column::Sequence)
            .one(&self.db)
            .await?;
        model.map(to_request).transpose()
    }

    /// Remove an entry after its replay was acknowledged.
    pub async fn pop_committed(&self, sequence: i64) -> Result<(), FifoError> {
        request_fifo::Entity::delete_by_id(sequence)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// All entries for one connector, oldest first.
    pub async fn iter_by_connector(
        &self,
        connector_id: i32,
    ) -> Result<Vec<DeferredRequest>, FifoError> {
        request_fifo::Entity::find()
            .filter(request_fifo::Column::ConnectorId.eq(connector_id))
            .order_by_asc(request_fifo::Column::Sequence)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_request)
            .collect()
    }

    pub async fn clear(&self, connector_id: i32) -> Result<(), FifoError> {
        request_fifo::Entity::delete_many()
            .filter(request_fifo::Column::ConnectorId.eq(connector_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<(), FifoError> {
        request_fifo::Entity::delete_many().exec(&self.db).await?;
        Ok(())
    }

    pub async fn len(&self) -> Result<usize, FifoError> {
        use sea_orm::PaginatorTrait;
        Ok(request_fifo::Entity::find().count(&self.db).await? as usize)
    }

    pub async fn is_empty(&self) -> Result<bool, FifoError> {
        // Cheaper than a full count
        Ok(request_fifo::Entity::find()
            .limit(1)
            .one(&self.db)
            .await?
            .is_none())
    }
}

fn to_request(model: request_fifo::Model) -> Result<DeferredRequest, FifoError> {
    Ok(DeferredRequest {
        sequence: model.sequence,
        connector_id: model.connector_id,
        action: model.action,
        payload: serde_json::from_str(&model.payload)?,
        enqueued_at: model.enqueued_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use serde_json::json;

    async fn fifo(capacity: usize) -> RequestFifo {
        Storage::connect("sqlite::memory:")
            .await
            .unwrap()
            .fifo(capacity)
    }

    #[tokio::test]
    async fn enqueue_peek_pop_in_order() {
        let fifo = fifo(10).await;

        let s1 = fifo
            .enqueue(1, "StatusNotification", &json!({"n": 1}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        let s2 = fifo
            .enqueue(2, "MeterValues", &json!({"n": 2}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        assert!(s2 > s1);

        let head = fifo.peek().await.unwrap().unwrap();
        assert_eq!(head.sequence, s1);
        assert_eq!(head.action, "StatusNotification");
        assert_eq!(head.payload["n"], 1);

        // Peek does not remove
        assert_eq!(fifo.len().await.unwrap(), 2);

        fifo.pop_committed(s1).await.unwrap();
        let head = fifo.peek().await.unwrap().unwrap();
        assert_eq!(head.sequence, s2);

        fifo.pop_committed(s2).await.unwrap();
        assert!(fifo.peek().await.unwrap().is_none());
        assert!(fifo.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn reject_policy_fails_when_full() {
        let fifo = fifo(2).await;
        for n in 0..2 {
            fifo.enqueue(1, "StartTransaction", &json!({"n": n}), QueueOverflowPolicy::Reject)
                .await
                .unwrap();
        }
        let err = fifo
            .enqueue(1, "StartTransaction", &json!({"n": 2}), QueueOverflowPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, FifoError::Full { .. }));
        assert_eq!(fifo.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn drop_oldest_policy_replaces_matching_entry() {
        let fifo = fifo(2).await;
        let first = fifo
            .enqueue(1, "MeterValues", &json!({"n": 0}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        fifo.enqueue(1, "MeterValues", &json!({"n": 1}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();

        // Full: the oldest MeterValues on connector 1 is dropped
        fifo.enqueue(1, "MeterValues", &json!({"n": 2}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();

        assert_eq!(fifo.len().await.unwrap(), 2);
        let head = fifo.peek().await.unwrap().unwrap();
        assert_ne!(head.sequence, first);
        assert_eq!(head.payload["n"], 1);
    }

    #[tokio::test]
    async fn drop_oldest_rejects_without_matching_victim() {
        let fifo = fifo(1).await;
        fifo.enqueue(1, "StartTransaction", &json!({}), QueueOverflowPolicy::Reject)
            .await
            .unwrap();
        // Full of foreign traffic: metering on another connector cannot evict it
        let err = fifo
            .enqueue(2, "MeterValues", &json!({}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap_err();
        assert!(matches!(err, FifoError::Full { .. }));
    }

    #[tokio::test]
    async fn iter_by_connector_is_ordered_and_filtered() {
        let fifo = fifo(10).await;
        fifo.enqueue(1, "StatusNotification", &json!({"n": 0}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        fifo.enqueue(2, "StatusNotification", &json!({"n": 1}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        fifo.enqueue(1, "MeterValues", &json!({"n": 2}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();

        let entries = fifo.iter_by_connector(1).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].sequence < entries[1].sequence);
        assert!(entries.iter().all(|e| e.connector_id == 1));
    }

    #[tokio::test]
    async fn clear_by_connector_and_all() {
        let fifo = fifo(10).await;
        fifo.enqueue(1, "StatusNotification", &json!({}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();
        fifo.enqueue(2, "StatusNotification", &json!({}), QueueOverflowPolicy::DropOldest)
            .await
            .unwrap();

        fifo.clear(1).await.unwrap();
        assert_eq!(fifo.len().await.unwrap(), 1);
        assert_eq!(fifo.peek().await.unwrap().unwrap().connector_id, 2);

        fifo.clear_all().await.unwrap();
        assert!(fifo.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn entries_survive_reopening_the_store_handle() {
        // Same connection, new RequestFifo value: sequence order is preserved
        let storage = Storage::connect("sqlite::memory:").await.unwrap();
        let fifo = storage.fifo(10);
        fifo.enqueue(1, "StopTransaction", &json!({"meterStop": 7}), QueueOverflowPolicy::Reject)
            .await
            .unwrap();

        let reopened = storage.fifo(10);
        let head = reopened.peek().await.unwrap().unwrap();
        assert_eq!(head.action, "StopTransaction");
        assert_eq!(head.payload["meterStop"], 7);
    }
}
