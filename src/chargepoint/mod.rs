//! Charge-point runtime
//!
//! Public entry point for embedding the stack in a station. `start()`
//! opens the database, loads the schema bundle, spawns the session state
//! machine and connects to the central system; the typed request wrappers
//! in [`requests`] then send or queue station-initiated traffic.

pub mod events;
pub mod outbound;
pub mod remote;
pub mod requests;
pub mod session;
pub mod v201;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use rust_ocpp::v1_6::types::ChargePointStatus;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::config::ChargePointConfig;
use crate::messages::V16Action;
use crate::scheduling::WorkerPool;
use crate::schemas::SchemaValidator;
use crate::storage::{kv, Storage};
use crate::support::{OcppError, OcppResult};
use crate::version::OcppVersion;

pub use events::{ChargePointEventsHandler, HandlerResult};
pub use session::{BootReason, RegistrationStatus, SessionState};
pub use v201::{ChargingStation, ChargingStationEventsHandler};

use remote::V16Protocol;
use session::{SessionEvent, SessionFsm, SessionShared};

struct Running {
    shared: Arc<SessionShared>,
    workers: Arc<WorkerPool>,
    actor: tokio::task::JoinHandle<()>,
}

/// An OCPP 1.6-J charge point.
pub struct ChargePoint {
    config: ChargePointConfig,
    handler: Arc<dyn ChargePointEventsHandler>,
    running: tokio::sync::Mutex<Option<Running>>,
    /// Lock-free snapshot for the synchronous accessors.
    shared_snapshot: RwLock<Option<Arc<SessionShared>>>,
}

impl ChargePoint {
    pub fn new(config: ChargePointConfig, handler: Arc<dyn ChargePointEventsHandler>) -> Self {
        Self {
            config,
            handler,
            running: tokio::sync::Mutex::new(None),
            shared_snapshot: RwLock::new(None),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────

    /// Start the stack: open storage, load schemas, connect and register.
    ///
    /// Fails without opening the transport when the schema bundle or the
    /// database is unusable. `boot_reason` is kept for the embedder and
    /// logged; OCPP 1.6 does not carry it on the wire.
    pub async fn start(&self, boot_reason: BootReason) -> OcppResult<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(OcppError::AlreadyStarted);
        }

        if self.config.connection.ocpp_version != OcppVersion::V16 {
            return Err(OcppError::Configuration(
                "ChargePoint drives OCPP 1.6 sessions; use ChargingStation for 2.0.1".into(),
            ));
        }

        info!(
            charge_point_id = self.config.identity.charge_point_id.as_str(),
            ?boot_reason,
            "Starting charge point"
        );

        let validator = SchemaValidator::load(
            &self.config.schemas_dir,
            &[self.config.connection.ocpp_version],
        )
        .map_err(|e| OcppError::SchemaDirectory(e.to_string()))?;

        let storage = Storage::connect(&self.config.database_url).await?;
        let kv_store = storage.kv();
        kv_store.initialize().await?;

        // Boot policy: a changed connection URL invalidates the cached
        // "offline operation allowed" state
        let url = self.config.connection_url();
        let last_url = kv_store.get(kv::LAST_CONNECTION_URL_KEY).await?;
        if last_url.as_deref() != Some(url.as_str()) {
            if last_url.map(|u| !u.is_empty()).unwrap_or(false) {
                warn!("Connection URL changed; resetting persisted registration status");
            }
            kv_store
                .set(kv::LAST_REGISTRATION_STATUS_KEY, "Rejected")
                .await?;
            kv_store.set(kv::LAST_CONNECTION_URL_KEY, &url).await?;
        }

        let last_registration = RegistrationStatus::from_persisted(
            &kv_store
                .get(kv::LAST_REGISTRATION_STATUS_KEY)
                .await?
                .unwrap_or_default(),
        );

        let workers = WorkerPool::new(self.config.worker_pool_size.max(2));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shared = SessionShared::new(
            self.config.clone(),
            Arc::new(validator),
            kv_store,
            storage.fifo(self.config.fifo_capacity),
            workers.clone(),
            events_tx,
            last_registration,
        );

        let protocol = Arc::new(V16Protocol::new(
            self.config.identity.clone(),
            self.handler.clone(),
        ));
        let actor = SessionFsm::spawn(shared.clone(), protocol, events_rx);

        *self.shared_snapshot.write().unwrap() = Some(shared.clone());
        *running = Some(Running {
            shared,
            workers,
            actor,
        });
        Ok(())
    }

    /// Stop the stack: cancel timers, close the transport, flush counters
    /// and drain outstanding worker tasks (bounded).
    pub async fn stop(&self) -> OcppResult<()> {
        let mut running = self.running.lock().await;
        let Some(run) = running.take() else {
            return Err(OcppError::NotStarted);
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        if run.shared.events.send(SessionEvent::Stop(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
        let _ = run.actor.await;
        run.workers.shutdown(Duration::from_secs(5)).await;

        *self.shared_snapshot.write().unwrap() = None;
        info!("Charge point stopped");
        Ok(())
    }

    /// Select the security profile for future connection attempts. Call
    /// [`reconnect`](Self::reconnect) to apply it immediately.
    pub fn set_security_profile(&self, profile: crate::security::SecurityProfile) -> OcppResult<()> {
        self.shared()?.set_security_profile(profile);
        Ok(())
    }

    /// Tear the connection down and rebuild it, re-reading the security
    /// profile and its credentials.
    pub async fn reconnect(&self) -> OcppResult<()> {
        let shared = self.shared()?;
        shared
            .events
            .send(SessionEvent::Reconnect)
            .map_err(|_| OcppError::NotStarted)?;
        Ok(())
    }

    /// Drop all stack-internal persistent data (counters and request FIFO).
    /// Only valid while stopped.
    pub async fn reset_data(&self) -> OcppResult<()> {
        if self.running.lock().await.is_some() {
            return Err(OcppError::AlreadyStarted);
        }
        let storage = Storage::connect(&self.config.database_url).await?;
        storage
            .fifo(self.config.fifo_capacity)
            .clear_all()
            .await
            .map_err(|e| OcppError::Storage(e.to_string()))?;
        let kv_store = storage.kv();
        kv_store.set_counter(kv::UPTIME_KEY, 0).await?;
        kv_store.set_counter(kv::DISCONNECTED_TIME_KEY, 0).await?;
        kv_store.set_counter(kv::TOTAL_UPTIME_KEY, 0).await?;
        kv_store
            .set_counter(kv::TOTAL_DISCONNECTED_TIME_KEY, 0)
            .await?;
        kv_store.set(kv::LAST_REGISTRATION_STATUS_KEY, "Rejected").await?;
        kv_store.set(kv::LAST_CONNECTION_URL_KEY, "").await?;
        Ok(())
    }

    /// Drop queued requests for one connector. Only valid while stopped.
    pub async fn reset_connector_data(&self, connector_id: u32) -> OcppResult<()> {
        if self.running.lock().await.is_some() {
            return Err(OcppError::AlreadyStarted);
        }
        let storage = Storage::connect(&self.config.database_url).await?;
        storage
            .fifo(self.config.fifo_capacity)
            .clear(connector_id as i32)
            .await
            .map_err(|e| OcppError::Storage(e.to_string()))?;
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────

    /// Last known registration status at the central system.
    pub fn registration_status(&self) -> RegistrationStatus {
        self.shared_snapshot
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.registration_status())
            .unwrap_or(RegistrationStatus::Rejected)
    }

    pub fn session_state(&self) -> SessionState {
        self.shared_snapshot
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.state())
            .unwrap_or(SessionState::Stopped)
    }

    pub fn is_connected(&self) -> bool {
        self.shared_snapshot
            .read()
            .unwrap()
            .as_ref()
            .and_then(|s| s.current_endpoint())
            .map(|e| e.is_connected())
            .unwrap_or(false)
    }

    /// Last status sent (or queued) for a connector.
    pub fn connector_status(&self, connector_id: u32) -> Option<ChargePointStatus> {
        self.shared_snapshot
            .read()
            .unwrap()
            .as_ref()
            .and_then(|s| {
                s.connector_status
                    .get(&(0, connector_id))
                    .and_then(|payload| serde_json::from_value(payload["status"].clone()).ok())
            })
    }

    // ── Internals used by the request wrappers ─────────────

    pub(crate) fn shared(&self) -> OcppResult<Arc<SessionShared>> {
        self.shared_snapshot
            .read()
            .unwrap()
            .clone()
            .ok_or(OcppError::NotStarted)
    }

    /// Send an action live, or queue it under the offline policy.
    ///
    /// `Ok(Some(response))` for a live round-trip, `Ok(None)` when the
    /// request was queued for replay.
    pub(crate) async fn send_or_queue(
        &self,
        connector_id: u32,
        action: V16Action,
        payload: Value,
    ) -> OcppResult<Option<Value>> {
        outbound::send_or_queue(
            &self.shared()?,
            connector_id,
            action.name(),
            action.offline_behavior(),
            payload,
        )
        .await
    }

    /// Outbound request that needs a live, Accepted session.
    pub(crate) async fn call_live(&self, action: V16Action, payload: Value) -> OcppResult<Value> {
        outbound::call_live(&self.shared()?, action.name(), payload).await
    }
}
