//! Central-system runtime
//!
//! Accepts charge-point connections at `ws://<host>:<port>/…/{charge_point_id}`,
//! negotiates the OCPP subprotocol, authenticates the station and binds an
//! RPC endpoint to its identity. The backend receives a [`StationHandle`]
//! per station, offering typed wrappers for every central-to-station Call.

pub mod commands;
pub mod events;
pub mod inbound;
pub mod session;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::CentralSystemConfig;
use crate::rpc::RpcEndpoint;
use crate::scheduling::WorkerPool;
use crate::schemas::SchemaValidator;
use crate::storage::{kv, Storage};
use crate::support::{OcppError, OcppResult, ShutdownSignal};
use crate::transport::{self, ws_server};

pub use events::CentralSystemEventsHandler;
pub use session::{RegisterOutcome, ServerSession, SessionRegistry, StationHandle};

use inbound::StationListener;

struct Running {
    shutdown: ShutdownSignal,
    accept_task: tokio::task::JoinHandle<()>,
    workers: Arc<WorkerPool>,
    validator: Arc<SchemaValidator>,
}

/// An OCPP central system (CSMS) serving 1.6 and 2.0.1 stations.
pub struct CentralSystem {
    config: CentralSystemConfig,
    handler: Arc<dyn CentralSystemEventsHandler>,
    registry: Arc<SessionRegistry>,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl CentralSystem {
    pub fn new(config: CentralSystemConfig, handler: Arc<dyn CentralSystemEventsHandler>) -> Self {
        Self {
            config,
            handler,
            registry: Arc::new(SessionRegistry::new()),
            running: tokio::sync::Mutex::new(None),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────

    /// Bind the listener and start accepting stations.
    pub async fn start(&self) -> OcppResult<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(OcppError::AlreadyStarted);
        }

        let validator = match &self.config.schemas_dir {
            Some(dir) => Arc::new(
                SchemaValidator::load(dir, &self.config.versions)
                    .map_err(|e| OcppError::SchemaDirectory(e.to_string()))?,
            ),
            None => Arc::new(SchemaValidator::empty()),
        };

        if let Some(url) = &self.config.database_url {
            let storage = Storage::connect(url).await?;
            storage.kv().initialize().await?;
        }

        let addr = self.config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| OcppError::Transport(format!("Failed to bind {}: {}", addr, e)))?;

        info!("OCPP Central System started on ws://{}", addr);
        info!(
            "   Charge points should connect to: ws://{}/<path>/{{charge_point_id}}",
            addr
        );

        let shutdown = ShutdownSignal::new();
        let workers = WorkerPool::new(self.config.worker_pool_size);
        let accept_task = tokio::spawn(accept_loop(
            listener,
            self.config.clone(),
            self.handler.clone(),
            self.registry.clone(),
            validator.clone(),
            workers.clone(),
            shutdown.clone(),
        ));

        *running = Some(Running {
            shutdown,
            accept_task,
            workers,
            validator,
        });
        Ok(())
    }

    /// Close every station connection and stop accepting new ones.
    pub async fn stop(&self) -> OcppResult<()> {
        let mut running = self.running.lock().await;
        let Some(run) = running.take() else {
            return Err(OcppError::NotStarted);
        };

        run.shutdown.trigger();
        self.registry.close_all();
        let _ = run.accept_task.await;
        run.workers.shutdown(Duration::from_secs(5)).await;

        info!("Central system stopped");
        Ok(())
    }

    /// Drop the stack-internal persistent data. Only valid while stopped
    /// and only when a database is configured.
    pub async fn reset_data(&self) -> OcppResult<()> {
        if self.running.lock().await.is_some() {
            return Err(OcppError::AlreadyStarted);
        }
        let Some(url) = &self.config.database_url else {
            return Ok(());
        };
        let storage = Storage::connect(url).await?;
        storage
            .fifo(1)
            .clear_all()
            .await
            .map_err(|e| OcppError::Storage(e.to_string()))?;
        let kv_store = storage.kv();
        kv_store.set(kv::LAST_REGISTRATION_STATUS_KEY, "Rejected").await?;
        kv_store.initialize().await?;
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────

    /// Handle for a currently connected station.
    pub fn station(&self, charge_point_id: &str) -> Option<StationHandle> {
        let session = self.registry.get(charge_point_id)?;
        let running = self.running.try_lock().ok()?;
        let validator = running.as_ref()?.validator.clone();
        Some(StationHandle {
            session,
            validator,
            call_timeout: self.config.call_timeout,
        })
    }

    pub fn connected_ids(&self) -> Vec<String> {
        self.registry.connected_ids()
    }

    pub fn is_station_connected(&self, charge_point_id: &str) -> bool {
        self.registry.is_connected(charge_point_id)
    }
}

// ── Accept loop ────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
async fn accept_loop(
    listener: TcpListener,
    config: CentralSystemConfig,
    handler: Arc<dyn CentralSystemEventsHandler>,
    registry: Arc<SessionRegistry>,
    validator: Arc<SchemaValidator>,
    workers: Arc<WorkerPool>,
    shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        let config = config.clone();
                        let handler = handler.clone();
                        let registry = registry.clone();
                        let validator = validator.clone();
                        let workers = workers.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(
                                stream, addr, config, handler, registry, validator, workers,
                            )
                            .await
                            {
                                warn!(%addr, error = %e, "Connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                    }
                }
            }
            _ = shutdown.notified().wait() => {
                info!("WebSocket server received shutdown signal");
                return;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    config: CentralSystemConfig,
    handler: Arc<dyn CentralSystemEventsHandler>,
    registry: Arc<SessionRegistry>,
    validator: Arc<SchemaValidator>,
    workers: Arc<WorkerPool>,
) -> Result<(), crate::transport::TransportError> {
    info!(%addr, "New connection");

    // Pre-handshake gate on the peer address
    if !handler.accept_connection(addr.ip()).await {
        warn!(%addr, "Connection refused by policy");
        return Ok(());
    }

    let (ws_stream, accepted) = ws_server::accept(stream, &config.versions).await?;
    let charge_point_id = accepted.charge_point_id;

    // HTTP Basic: the username MUST equal the charge-point id; the backend
    // only ever sees (id, password)
    let password = match accepted.basic_credentials {
        Some((username, password)) => {
            if username != charge_point_id {
                warn!(
                    charge_point_id = charge_point_id.as_str(),
                    username = username.as_str(),
                    "Basic-auth username does not match charge point id"
                );
                return Ok(());
            }
            password
        }
        None => String::new(),
    };
    if !handler.check_credentials(&charge_point_id, &password).await {
        warn!(
            charge_point_id = charge_point_id.as_str(),
            "Credentials rejected"
        );
        return Ok(());
    }

    // Bind the RPC endpoint to the station identity
    let (writer_tx, writer_rx) = mpsc::unbounded_channel();
    let endpoint = RpcEndpoint::new(charge_point_id.clone(), writer_tx, workers.clone());
    let connection_shutdown = ShutdownSignal::new();
    let session = Arc::new(ServerSession {
        charge_point_id: charge_point_id.clone(),
        version: accepted.version,
        endpoint: endpoint.clone(),
        connected_at: Utc::now(),
        shutdown: connection_shutdown.clone(),
    });

    endpoint.set_listener(Arc::new(StationListener::new(
        session.clone(),
        handler.clone(),
        registry.clone(),
        validator.clone(),
    )));

    registry.register(session.clone());

    let station = StationHandle {
        session: session.clone(),
        validator,
        call_timeout: config.call_timeout,
    };
    {
        let handler = handler.clone();
        workers.spawn(async move {
            handler.station_connected(station).await;
        });
    }

    transport::drive(ws_stream, writer_rx, endpoint, Some(connection_shutdown)).await;

    info!(charge_point_id = charge_point_id.as_str(), "Disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::chargepoint::{
        BootReason, ChargePoint, ChargePointEventsHandler, ChargingStation, RegistrationStatus,
    };
    use crate::config::{ChargePointConfig, StationIdentity};
    use crate::version::OcppVersion;

    struct RecordingBackend {
        connected: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CentralSystemEventsHandler for RecordingBackend {
        async fn station_connected(&self, station: StationHandle) {
            self.connected
                .lock()
                .unwrap()
                .push(station.charge_point_id().to_string());
        }
    }

    struct QuietStation;

    #[async_trait]
    impl ChargePointEventsHandler for QuietStation {}

    struct QuietChargingStation;

    #[async_trait]
    impl crate::chargepoint::ChargingStationEventsHandler for QuietChargingStation {}

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    fn schemas_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("ocpp-e2e-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(dir.join("ocpp16")).unwrap();
        std::fs::create_dir_all(dir.join("ocpp20")).unwrap();
        dir
    }

    async fn wait_for<F: Fn() -> bool>(what: &str, check: F) {
        for _ in 0..100 {
            if check() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("Timed out waiting for {}", what);
    }

    #[tokio::test]
    async fn boot_accepted_end_to_end() {
        init_tracing();
        let dir = schemas_dir("boot");

        let backend = Arc::new(RecordingBackend {
            connected: Mutex::new(Vec::new()),
        });
        let cs = CentralSystem::new(
            CentralSystemConfig::new("127.0.0.1", 19716),
            backend.clone(),
        );
        cs.start().await.unwrap();

        let mut config = ChargePointConfig::new(StationIdentity::new("CP-E2E", "ACME", "X1"), &dir);
        config.connection.central_system_url = "ws://127.0.0.1:19716/ocpp".into();
        config.connection.ocpp_version = OcppVersion::V16;
        let cp = ChargePoint::new(config, Arc::new(QuietStation));
        cp.start(BootReason::PowerUp).await.unwrap();

        // The default backend accepts every BootNotification
        wait_for("registration", || {
            cp.registration_status() == RegistrationStatus::Accepted
        })
        .await;
        assert!(cp.is_connected());

        wait_for("station binding", || cs.is_station_connected("CP-E2E")).await;
        assert_eq!(backend.connected.lock().unwrap().as_slice(), ["CP-E2E"]);

        // Typed command through the station proxy
        let station = cs.station("CP-E2E").unwrap();
        assert_eq!(station.ocpp_version(), OcppVersion::V16);

        cp.stop().await.unwrap();
        cs.stop().await.unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn charging_station_boot_accepted_end_to_end() {
        init_tracing();
        let dir = schemas_dir("boot20");

        let backend = Arc::new(RecordingBackend {
            connected: Mutex::new(Vec::new()),
        });
        let cs = CentralSystem::new(
            CentralSystemConfig::new("127.0.0.1", 19718),
            backend.clone(),
        );
        cs.start().await.unwrap();

        let mut config = ChargePointConfig::new(StationIdentity::new("CS-E2E", "ACME", "X2"), &dir);
        config.connection.central_system_url = "ws://127.0.0.1:19718/ocpp".into();
        config.connection.ocpp_version = OcppVersion::V201;
        let station = ChargingStation::new(config, Arc::new(QuietChargingStation));
        station.start(BootReason::PowerUp).await.unwrap();

        // The default backend accepts every 2.0.1 BootNotification too
        wait_for("registration", || {
            station.registration_status() == RegistrationStatus::Accepted
        })
        .await;
        assert!(station.is_connected());

        wait_for("station binding", || cs.is_station_connected("CS-E2E")).await;
        let handle = cs.station("CS-E2E").unwrap();
        assert_eq!(handle.ocpp_version(), OcppVersion::V201);

        station.stop().await.unwrap();
        cs.stop().await.unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn second_station_connection_replaces_first() {
        init_tracing();
        let dir = schemas_dir("evict");

        let backend = Arc::new(RecordingBackend {
            connected: Mutex::new(Vec::new()),
        });
        let cs = CentralSystem::new(
            CentralSystemConfig::new("127.0.0.1", 19717),
            backend.clone(),
        );
        cs.start().await.unwrap();

        let station = |tag: &str| {
            let mut config =
                ChargePointConfig::new(StationIdentity::new("CP-DUP", "ACME", tag), &dir);
            config.connection.central_system_url = "ws://127.0.0.1:19717/ocpp".into();
            // Keep the evicted station from reconnecting mid-test
            config.connection.retry_interval = Duration::from_secs(60);
            ChargePoint::new(config, Arc::new(QuietStation))
        };

        let first = station("X1");
        first.start(BootReason::PowerUp).await.unwrap();
        wait_for("first registration", || {
            first.registration_status() == RegistrationStatus::Accepted
        })
        .await;

        let second = station("X2");
        second.start(BootReason::PowerUp).await.unwrap();
        wait_for("second registration", || {
            second.registration_status() == RegistrationStatus::Accepted
        })
        .await;

        // The id stays bound; the first connection was evicted
        wait_for("eviction", || !first.is_connected()).await;
        assert!(cs.is_station_connected("CP-DUP"));
        assert_eq!(backend.connected.lock().unwrap().len(), 2);

        second.stop().await.unwrap();
        first.stop().await.unwrap();
        cs.stop().await.unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }
}
