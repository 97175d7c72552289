//! Charge-point session state machine
//!
//! One actor task owns the connection lifecycle: connect, register through
//! BootNotification, keep the heartbeat cadence, account uptime, replay the
//! offline FIFO after acceptance and reconnect with back-off after a drop.
//! The rest of the stack talks to it through [`SessionEvent`]s and reads
//! snapshots from [`SessionShared`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ChargePointConfig;
use crate::dispatch::call_typed;
use crate::rpc::{CallFailure, RpcEndpoint, RpcListener};
use crate::scheduling::{Timer, TimerPool, WorkerPool};
use crate::schemas::SchemaValidator;
use crate::security::credentials_for;
use crate::storage::{kv, InternalKvStore, RequestFifo};
use crate::support::ShutdownSignal;
use crate::transport::{self, ws_client};

/// Counters are persisted every this many 1-Hz ticks.
const PERSIST_EVERY_TICKS: u32 = 15;

// ── Public state types ─────────────────────────────────────────

/// Registration status of the station at the central system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Accepted,
    Pending,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse the persisted value; anything unexpected reads as Rejected so
    /// offline operation is never allowed on corrupt state.
    pub fn from_persisted(s: &str) -> Self {
        match s {
            "Accepted" => Self::Accepted,
            "Pending" => Self::Pending,
            _ => Self::Rejected,
        }
    }
}

impl From<rust_ocpp::v1_6::types::RegistrationStatus> for RegistrationStatus {
    fn from(status: rust_ocpp::v1_6::types::RegistrationStatus) -> Self {
        use rust_ocpp::v1_6::types::RegistrationStatus as Wire;
        match status {
            Wire::Accepted => Self::Accepted,
            Wire::Pending => Self::Pending,
            Wire::Rejected => Self::Rejected,
        }
    }
}

/// Reason reported when the station (re)boots. OCPP 1.6 does not carry it
/// on the wire; it is logged and kept for the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootReason {
    ApplicationReset,
    FirmwareUpdate,
    LocalReset,
    PowerUp,
    RemoteReset,
    ScheduledReset,
    Triggered,
    Unknown,
    Watchdog,
}

/// Connection lifecycle state of the charge-point session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Connecting,
    Connected,
    Pending,
    Accepted,
    Rejected,
    Reconnecting,
    Stopping,
}

// ── Protocol adapter ───────────────────────────────────────────

/// The OCPP-version-specific half of the session: payload construction for
/// the session-owned messages, the inbound-command listener and the typed
/// lifecycle callbacks. One implementation per supported version; the
/// state machine itself is version-agnostic.
#[async_trait]
pub(crate) trait SessionProtocol: Send + Sync {
    /// BootNotification request payload for this station.
    fn boot_request(&self) -> Value;

    /// Extract (status, interval seconds) from a BootNotification response.
    /// `None` when the payload cannot be understood.
    fn parse_boot_response(&self, payload: &Value) -> Option<(RegistrationStatus, i32)>;

    /// Heartbeat request payload (an empty object in every OCPP version).
    fn heartbeat_request(&self) -> Value {
        json!({})
    }

    /// Listener routing inbound central-system commands for one connection.
    fn listener(&self, shared: &Arc<SessionShared>) -> Arc<dyn RpcListener>;

    async fn connection_state_changed(&self, connected: bool);

    async fn registration_status_changed(&self, status: RegistrationStatus);
}

// ── Events ─────────────────────────────────────────────────────

/// Input to the session actor.
pub(crate) enum SessionEvent {
    Connected(Arc<RpcEndpoint>),
    ConnectFailed(String),
    RpcDisconnected,
    BootResult {
        status: RegistrationStatus,
        interval_seconds: i32,
    },
    BootFailed,
    BootRetryDue,
    HeartbeatDue,
    ReconnectDue,
    ReplayFailed,
    ReplayDue,
    Tick,
    TriggerHeartbeat,
    TriggerBootNotification,
    TriggerStatusNotifications,
    Reconnect,
    Stop(oneshot::Sender<()>),
}

// ── Shared snapshot ────────────────────────────────────────────

/// State shared between the actor, the public API and the remote-command
/// listener. Everything here is a snapshot; the actor owns the truth.
pub(crate) struct SessionShared {
    pub config: ChargePointConfig,
    pub validator: Arc<SchemaValidator>,
    pub kv: InternalKvStore,
    pub fifo: RequestFifo,
    pub workers: Arc<WorkerPool>,
    pub events: mpsc::UnboundedSender<SessionEvent>,

    endpoint: RwLock<Option<Arc<RpcEndpoint>>>,
    state: RwLock<SessionState>,
    registration: RwLock<RegistrationStatus>,
    /// Profile in effect for the next connection attempt. Switching it
    /// only matters after a reconnect.
    security_profile: RwLock<crate::security::SecurityProfile>,
    offline_allowed: AtomicBool,
    pub replaying: AtomicBool,
    /// Last StatusNotification payload sent (or queued), keyed by
    /// (evse id, connector id); OCPP 1.6 uses evse 0.
    pub connector_status: DashMap<(u32, u32), Value>,
}

impl SessionShared {
    pub fn new(
        config: ChargePointConfig,
        validator: Arc<SchemaValidator>,
        kv: InternalKvStore,
        fifo: RequestFifo,
        workers: Arc<WorkerPool>,
        events: mpsc::UnboundedSender<SessionEvent>,
        last_registration: RegistrationStatus,
    ) -> Arc<Self> {
        let config_profile = config.connection.security_profile;
        Arc::new(Self {
            config,
            validator,
            kv,
            fifo,
            workers,
            events,
            endpoint: RwLock::new(None),
            state: RwLock::new(SessionState::Stopped),
            registration: RwLock::new(last_registration),
            security_profile: RwLock::new(config_profile),
            offline_allowed: AtomicBool::new(last_registration == RegistrationStatus::Accepted),
            replaying: AtomicBool::new(false),
            connector_status: DashMap::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap() = state;
    }

    pub fn registration_status(&self) -> RegistrationStatus {
        *self.registration.read().unwrap()
    }

    fn set_registration(&self, status: RegistrationStatus) {
        *self.registration.write().unwrap() = status;
        self.offline_allowed
            .store(status == RegistrationStatus::Accepted, Ordering::SeqCst);
    }

    /// Offline transactional traffic is allowed while the last known
    /// registration status is Accepted.
    pub fn offline_allowed(&self) -> bool {
        self.offline_allowed.load(Ordering::SeqCst)
    }

    pub fn current_endpoint(&self) -> Option<Arc<RpcEndpoint>> {
        self.endpoint.read().unwrap().clone()
    }

    fn set_endpoint(&self, endpoint: Option<Arc<RpcEndpoint>>) {
        *self.endpoint.write().unwrap() = endpoint;
    }

    pub fn security_profile(&self) -> crate::security::SecurityProfile {
        *self.security_profile.read().unwrap()
    }

    pub fn set_security_profile(&self, profile: crate::security::SecurityProfile) {
        *self.security_profile.write().unwrap() = profile;
    }

    /// Gate applied before any outbound Call leaves the station.
    pub fn may_send_live(&self) -> bool {
        self.state() == SessionState::Accepted && self.current_endpoint().is_some()
    }
}

// ── The actor ──────────────────────────────────────────────────

pub(crate) struct SessionFsm {
    shared: Arc<SessionShared>,
    protocol: Arc<dyn SessionProtocol>,

    heartbeat_timer: Timer,
    boot_retry_timer: Timer,
    reconnect_timer: Timer,
    replay_retry_timer: Timer,
    tick_timer: Timer,
    // Keeps callbacks alive for the actor's lifetime
    _timers: Arc<TimerPool>,

    heartbeat_interval: Duration,
    connection_shutdown: Option<ShutdownSignal>,
    reconnect_immediately: bool,

    uptime: u64,
    disconnected_time: u64,
    total_uptime: u64,
    total_disconnected_time: u64,
    ticks_since_persist: u32,
}

impl SessionFsm {
    pub fn spawn(
        shared: Arc<SessionShared>,
        protocol: Arc<dyn SessionProtocol>,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let timers = TimerPool::new();
        let events = &shared.events;

        let heartbeat_timer = {
            let tx = events.clone();
            timers.create_timer(move || {
                let _ = tx.send(SessionEvent::HeartbeatDue);
            })
        };
        let boot_retry_timer = {
            let tx = events.clone();
            timers.create_timer(move || {
                let _ = tx.send(SessionEvent::BootRetryDue);
            })
        };
        let reconnect_timer = {
            let tx = events.clone();
            timers.create_timer(move || {
                let _ = tx.send(SessionEvent::ReconnectDue);
            })
        };
        let replay_retry_timer = {
            let tx = events.clone();
            timers.create_timer(move || {
                let _ = tx.send(SessionEvent::ReplayDue);
            })
        };
        let tick_timer = {
            let tx = events.clone();
            timers.create_timer(move || {
                let _ = tx.send(SessionEvent::Tick);
            })
        };

        let heartbeat_interval = shared.config.connection.heartbeat_interval;
        let fsm = Self {
            shared,
            protocol,
            heartbeat_timer,
            boot_retry_timer,
            reconnect_timer,
            replay_retry_timer,
            tick_timer,
            _timers: timers,
            heartbeat_interval,
            connection_shutdown: None,
            reconnect_immediately: false,
            uptime: 0,
            disconnected_time: 0,
            total_uptime: 0,
            total_disconnected_time: 0,
            ticks_since_persist: 0,
        };

        tokio::spawn(fsm.run(events_rx))
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        self.initialize().await;
        self.start_connect();

        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Connected(endpoint) => self.on_connected(endpoint).await,
                SessionEvent::ConnectFailed(reason) => self.on_connect_failed(reason).await,
                SessionEvent::RpcDisconnected => self.on_disconnected().await,
                SessionEvent::BootResult {
                    status,
                    interval_seconds,
                } => self.on_boot_result(status, interval_seconds).await,
                SessionEvent::BootFailed => self.on_boot_failed(),
                SessionEvent::BootRetryDue => self.send_boot_notification(),
                SessionEvent::HeartbeatDue => self.on_heartbeat_due(),
                SessionEvent::ReconnectDue => self.start_connect(),
                SessionEvent::ReplayFailed => {
                    self.replay_retry_timer
                        .start_single_shot(self.shared.config.connection.retry_interval);
                }
                SessionEvent::ReplayDue => self.start_replay(),
                SessionEvent::Tick => self.on_tick(),
                SessionEvent::TriggerHeartbeat => self.spawn_heartbeat(),
                SessionEvent::TriggerBootNotification => self.send_boot_notification(),
                SessionEvent::TriggerStatusNotifications => self.send_cached_statuses(),
                SessionEvent::Reconnect => self.on_reconnect_requested(),
                SessionEvent::Stop(ack) => {
                    self.on_stop().await;
                    let _ = ack.send(());
                    break;
                }
            }
        }

        debug!("Session actor stopped");
    }

    /// Load counters, stamp the session start and arm the 1-Hz tick.
    async fn initialize(&mut self) {
        let kv = &self.shared.kv;
        self.total_uptime = kv.get_counter(kv::TOTAL_UPTIME_KEY).await.unwrap_or(0);
        self.total_disconnected_time = kv
            .get_counter(kv::TOTAL_DISCONNECTED_TIME_KEY)
            .await
            .unwrap_or(0);

        if let Err(e) = kv.set(kv::START_DATE_KEY, &Utc::now().to_rfc3339()).await {
            error!(error = %e, "Failed to stamp session start date");
        }
        let _ = kv.set_counter(kv::UPTIME_KEY, 0).await;
        let _ = kv.set_counter(kv::DISCONNECTED_TIME_KEY, 0).await;

        self.tick_timer.start(Duration::from_secs(1));
    }

    // ── Connection ─────────────────────────────────────────

    fn start_connect(&mut self) {
        let shared = self.shared.clone();
        if matches!(shared.state(), SessionState::Stopping) {
            return;
        }
        shared.set_state(SessionState::Connecting);

        let url = shared.config.connection_url();
        // Re-resolved on every attempt so a profile switch takes effect at
        // the next reconnect
        let profile = shared.security_profile();
        let version = shared.config.connection.ocpp_version;
        let credentials = credentials_for(
            profile,
            &shared.config.identity.charge_point_id,
            &shared.config.security,
        );

        let shutdown = ShutdownSignal::new();
        self.connection_shutdown = Some(shutdown.clone());

        let protocol = self.protocol.clone();
        info!(url = url.as_str(), %profile, "Connecting to central system");

        tokio::spawn(async move {
            match ws_client::connect(&url, version, profile, &credentials).await {
                Ok(stream) => {
                    let (writer_tx, writer_rx) = mpsc::unbounded_channel();
                    let endpoint = RpcEndpoint::new(
                        shared.config.identity.charge_point_id.clone(),
                        writer_tx,
                        shared.workers.clone(),
                    );
                    endpoint.set_listener(protocol.listener(&shared));

                    let _ = shared.events.send(SessionEvent::Connected(endpoint.clone()));
                    transport::drive(stream, writer_rx, endpoint, Some(shutdown)).await;
                    // transport_closed() has notified the listener, which
                    // reports RpcDisconnected to the actor
                }
                Err(e) => {
                    warn!(error = %e, "Connection attempt failed");
                    let _ = shared
                        .events
                        .send(SessionEvent::ConnectFailed(e.to_string()));
                }
            }
        });
    }

    async fn on_connected(&mut self, endpoint: Arc<RpcEndpoint>) {
        self.shared.set_endpoint(Some(endpoint));
        self.shared.set_state(SessionState::Connected);

        let protocol = self.protocol.clone();
        self.shared.workers.spawn(async move {
            protocol.connection_state_changed(true).await;
        });

        self.send_boot_notification();
    }

    async fn on_connect_failed(&mut self, _reason: String) {
        if matches!(self.shared.state(), SessionState::Stopping) {
            return;
        }
        // Registration status keeps its last known value so offline
        // operation stays available after a failed attempt
        self.shared.set_state(SessionState::Reconnecting);
        self.reconnect_timer
            .start_single_shot(self.shared.config.connection.retry_interval);
    }

    async fn on_disconnected(&mut self) {
        self.shared.set_endpoint(None);
        self.heartbeat_timer.stop();
        self.boot_retry_timer.stop();

        if matches!(self.shared.state(), SessionState::Stopping) {
            return;
        }

        info!("Session disconnected");
        self.shared.set_state(SessionState::Reconnecting);

        let protocol = self.protocol.clone();
        self.shared.workers.spawn(async move {
            protocol.connection_state_changed(false).await;
        });

        if self.reconnect_immediately {
            self.reconnect_immediately = false;
            self.start_connect();
        } else {
            self.reconnect_timer
                .start_single_shot(self.shared.config.connection.retry_interval);
        }
    }

    fn on_reconnect_requested(&mut self) {
        match self.connection_shutdown.take() {
            Some(shutdown) if self.shared.current_endpoint().is_some() => {
                // Close the live connection; reconnect from the disconnect path
                self.reconnect_immediately = true;
                shutdown.trigger();
            }
            _ => {
                self.reconnect_timer.stop();
                self.start_connect();
            }
        }
    }

    // ── Boot notification ──────────────────────────────────

    fn send_boot_notification(&mut self) {
        let shared = self.shared.clone();
        let Some(endpoint) = shared.current_endpoint() else {
            return;
        };

        let protocol = self.protocol.clone();
        let request = protocol.boot_request();
        let timeout = shared.config.connection.call_timeout;
        let version = shared.config.connection.ocpp_version;
        self.shared.workers.spawn(async move {
            let result = call_typed::<Value, Value>(
                &endpoint,
                &shared.validator,
                version,
                "BootNotification",
                &request,
                timeout,
            )
            .await;

            match result {
                Ok(response) => match protocol.parse_boot_response(&response) {
                    Some((status, interval_seconds)) => {
                        let _ = shared.events.send(SessionEvent::BootResult {
                            status,
                            interval_seconds,
                        });
                    }
                    None => {
                        warn!("BootNotification response not understood");
                        let _ = shared.events.send(SessionEvent::BootFailed);
                    }
                },
                Err(CallFailure::ConnectionLost) | Err(CallFailure::NotConnected) => {
                    // The disconnect path owns recovery
                }
                Err(e) => {
                    warn!(error = %e, "BootNotification failed");
                    let _ = shared.events.send(SessionEvent::BootFailed);
                }
            }
        });
    }

    async fn on_boot_result(&mut self, status: RegistrationStatus, interval_seconds: i32) {
        let interval = if interval_seconds > 0 {
            Duration::from_secs(interval_seconds as u64)
        } else {
            self.shared.config.connection.heartbeat_interval
        };

        info!(?status, interval_seconds, "BootNotification answered");

        self.shared.set_registration(status);
        if let Err(e) = self
            .shared
            .kv
            .set(kv::LAST_REGISTRATION_STATUS_KEY, status.as_str())
            .await
        {
            error!(error = %e, "Failed to persist registration status");
        }

        match status {
            RegistrationStatus::Accepted => {
                self.shared.set_state(SessionState::Accepted);
                self.heartbeat_interval = interval;
                self.heartbeat_timer.stop();
                self.heartbeat_timer.start(interval);
                self.start_replay();
            }
            RegistrationStatus::Pending => {
                self.shared.set_state(SessionState::Pending);
                // Only BootNotification may be repeated; retry at the pace
                // the central system asked for
                let retry = if interval_seconds > 0 {
                    interval
                } else {
                    self.shared.config.connection.boot_notification_retry_interval
                };
                self.boot_retry_timer.start_single_shot(retry);
            }
            RegistrationStatus::Rejected => {
                self.shared.set_state(SessionState::Rejected);
                // No retry until an explicit start()/reconnect()
            }
        }

        let protocol = self.protocol.clone();
        self.shared.workers.spawn(async move {
            protocol.registration_status_changed(status).await;
        });
    }

    fn on_boot_failed(&mut self) {
        if matches!(self.shared.state(), SessionState::Connected) {
            self.boot_retry_timer.start_single_shot(
                self.shared.config.connection.boot_notification_retry_interval,
            );
        }
    }

    // ── Heartbeat ──────────────────────────────────────────

    fn on_heartbeat_due(&mut self) {
        if self.shared.state() != SessionState::Accepted {
            return;
        }
        let Some(endpoint) = self.shared.current_endpoint() else {
            return;
        };
        // Any outbound message resets the cadence; skip when traffic was
        // recent enough
        let idle = endpoint.last_sent_at().elapsed();
        if idle + Duration::from_secs(1) < self.heartbeat_interval {
            return;
        }
        self.spawn_heartbeat();
    }

    fn spawn_heartbeat(&self) {
        let shared = self.shared.clone();
        let Some(endpoint) = shared.current_endpoint() else {
            return;
        };
        let request = self.protocol.heartbeat_request();
        let timeout = shared.config.connection.call_timeout;
        let version = shared.config.connection.ocpp_version;
        self.shared.workers.spawn(async move {
            match call_typed::<Value, Value>(
                &endpoint,
                &shared.validator,
                version,
                "Heartbeat",
                &request,
                timeout,
            )
            .await
            {
                Ok(response) => {
                    debug!(current_time = ?response.get("currentTime"), "Heartbeat answered");
                }
                Err(e) => warn!(error = %e, "Heartbeat failed"),
            }
        });
    }

    // ── FIFO replay ────────────────────────────────────────

    fn start_replay(&self) {
        let shared = self.shared.clone();
        if shared.replaying.swap(true, Ordering::SeqCst) {
            return;
        }

        tokio::spawn(async move {
            let timeout = shared.config.connection.call_timeout;
            loop {
                if shared.state() != SessionState::Accepted {
                    break;
                }
                let Some(endpoint) = shared.current_endpoint() else {
                    break;
                };

                let entry = match shared.fifo.peek().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "FIFO read failed during replay");
                        break;
                    }
                };

                debug!(
                    action = entry.action.as_str(),
                    sequence = entry.sequence,
                    "Replaying deferred request"
                );

                match endpoint
                    .call(&entry.action, entry.payload.clone(), timeout)
                    .await
                {
                    Ok(_) => {
                        if let Err(e) = shared.fifo.pop_committed(entry.sequence).await {
                            error!(error = %e, "Failed to commit replayed request");
                            break;
                        }
                    }
                    Err(CallFailure::PeerError { code, description }) => {
                        // Delivered but refused; replaying again would only
                        // duplicate the refusal
                        warn!(
                            action = entry.action.as_str(),
                            %code,
                            description = description.as_str(),
                            "Central system refused replayed request; discarding"
                        );
                        if shared.fifo.pop_committed(entry.sequence).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Replay interrupted; will retry");
                        let _ = shared.events.send(SessionEvent::ReplayFailed);
                        break;
                    }
                }
            }
            shared.replaying.store(false, Ordering::SeqCst);
        });
    }

    // ── Triggered sends ────────────────────────────────────

    fn send_cached_statuses(&self) {
        let shared = self.shared.clone();
        if !shared.may_send_live() {
            return;
        }
        let Some(endpoint) = shared.current_endpoint() else {
            return;
        };
        let statuses: Vec<Value> = shared
            .connector_status
            .iter()
            .map(|e| e.value().clone())
            .collect();
        let timeout = shared.config.connection.call_timeout;
        let version = shared.config.connection.ocpp_version;
        self.shared.workers.spawn(async move {
            for request in statuses {
                let result = call_typed::<Value, Value>(
                    &endpoint,
                    &shared.validator,
                    version,
                    "StatusNotification",
                    &request,
                    timeout,
                )
                .await;
                if let Err(e) = result {
                    warn!(error = %e, "Triggered StatusNotification failed");
                    break;
                }
            }
        });
    }

    // ── Uptime accounting ──────────────────────────────────

    fn on_tick(&mut self) {
        self.uptime += 1;
        self.total_uptime += 1;

        let connected = self
            .shared
            .current_endpoint()
            .map(|e| e.is_connected())
            .unwrap_or(false);
        if !connected {
            self.disconnected_time += 1;
            self.total_disconnected_time += 1;
        }

        self.ticks_since_persist += 1;
        if self.ticks_since_persist >= PERSIST_EVERY_TICKS {
            self.ticks_since_persist = 0;
            self.persist_counters();
        }
    }

    /// Counter writes run on the worker pool, never on the timer path.
    fn persist_counters(&self) {
        let kv = self.shared.kv.clone();
        let uptime = self.uptime;
        let disconnected = self.disconnected_time;
        let total_uptime = self.total_uptime;
        let total_disconnected = self.total_disconnected_time;
        self.shared.workers.spawn(async move {
            let result = async {
                kv.set_counter(kv::UPTIME_KEY, uptime).await?;
                kv.set_counter(kv::DISCONNECTED_TIME_KEY, disconnected).await?;
                kv.set_counter(kv::TOTAL_UPTIME_KEY, total_uptime).await?;
                kv.set_counter(kv::TOTAL_DISCONNECTED_TIME_KEY, total_disconnected)
                    .await
            }
            .await;
            if let Err(e) = result {
                error!(error = %e, "Failed to persist uptime counters");
            }
        });
    }

    // ── Stop ───────────────────────────────────────────────

    async fn on_stop(&mut self) {
        info!("Stopping charge-point session");
        self.shared.set_state(SessionState::Stopping);

        self.heartbeat_timer.stop();
        self.boot_retry_timer.stop();
        self.reconnect_timer.stop();
        self.replay_retry_timer.stop();
        self.tick_timer.stop();

        if let Some(shutdown) = self.connection_shutdown.take() {
            shutdown.trigger();
        }

        // Final counter flush happens inline; the worker pool may already
        // be draining
        let kv = &self.shared.kv;
        let _ = kv.set_counter(kv::UPTIME_KEY, self.uptime).await;
        let _ = kv
            .set_counter(kv::DISCONNECTED_TIME_KEY, self.disconnected_time)
            .await;
        let _ = kv.set_counter(kv::TOTAL_UPTIME_KEY, self.total_uptime).await;
        let _ = kv
            .set_counter(kv::TOTAL_DISCONNECTED_TIME_KEY, self.total_disconnected_time)
            .await;

        self.shared.set_endpoint(None);
        self.shared.set_state(SessionState::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_status_roundtrip() {
        for status in [
            RegistrationStatus::Accepted,
            RegistrationStatus::Pending,
            RegistrationStatus::Rejected,
        ] {
            assert_eq!(RegistrationStatus::from_persisted(status.as_str()), status);
        }
    }

    #[test]
    fn corrupt_persisted_status_reads_rejected() {
        assert_eq!(
            RegistrationStatus::from_persisted("definitely not a status"),
            RegistrationStatus::Rejected
        );
        assert_eq!(
            RegistrationStatus::from_persisted(""),
            RegistrationStatus::Rejected
        );
    }
}
