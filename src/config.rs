//! Configuration module
//!
//! Plain configuration structs filled in by the embedding application.
//! File formats and loaders are the embedder's concern.

use std::path::PathBuf;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when the charge-point id becomes a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

use crate::security::{SecurityConfig, SecurityProfile};
use crate::version::OcppVersion;

// ── Charge-point side ──────────────────────────────────────────

/// Identity a charge point reports in its BootNotification.
#[derive(Debug, Clone)]
pub struct StationIdentity {
    /// Charge point identifier; terminates the connection URL path and is
    /// the HTTP Basic username for profiles 1/2.
    pub charge_point_id: String,
    pub vendor: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub iccid: Option<String>,
    pub imsi: Option<String>,
    pub meter_type: Option<String>,
    pub meter_serial_number: Option<String>,
}

impl StationIdentity {
    pub fn new(
        charge_point_id: impl Into<String>,
        vendor: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            charge_point_id: charge_point_id.into(),
            vendor: vendor.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
            iccid: None,
            imsi: None,
            meter_type: None,
            meter_serial_number: None,
        }
    }
}

/// Connection parameters towards the central system.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the central system (`ws://…` or `wss://…`); the
    /// charge-point id is appended as the final path segment.
    pub central_system_url: String,
    pub ocpp_version: OcppVersion,
    pub security_profile: SecurityProfile,
    /// Timeout applied to every outbound call.
    pub call_timeout: Duration,
    /// Back-off between reconnection attempts.
    pub retry_interval: Duration,
    /// Fallback BootNotification retry interval when the central system
    /// answers Pending without an interval worth using.
    pub boot_notification_retry_interval: Duration,
    /// Heartbeat cadence used until a BootNotification response supplies one.
    pub heartbeat_interval: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            central_system_url: "ws://127.0.0.1:9000/ocpp".to_string(),
            ocpp_version: OcppVersion::V16,
            security_profile: SecurityProfile::Unsecured,
            call_timeout: Duration::from_secs(30),
            retry_interval: Duration::from_secs(5),
            boot_notification_retry_interval: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(300),
        }
    }
}

/// Full charge-point stack configuration.
#[derive(Debug, Clone)]
pub struct ChargePointConfig {
    pub identity: StationIdentity,
    pub connection: ConnectionConfig,
    pub security: SecurityConfig,
    /// SQLite URL for the stack database, e.g. `sqlite://ocpp.db?mode=rwc`.
    pub database_url: String,
    /// Root of the JSON schema bundle (`<root>/ocpp16/…`).
    pub schemas_dir: PathBuf,
    /// Maximum number of entries in the offline request FIFO.
    pub fifo_capacity: usize,
    /// Worker pool size; the session needs at least 2.
    pub worker_pool_size: usize,
}

impl ChargePointConfig {
    pub fn new(identity: StationIdentity, schemas_dir: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            connection: ConnectionConfig::default(),
            security: SecurityConfig::default(),
            database_url: "sqlite::memory:".to_string(),
            schemas_dir: schemas_dir.into(),
            fifo_capacity: 100,
            worker_pool_size: 2,
        }
    }

    /// Full connection URL with the percent-encoded charge-point id
    /// appended as the last path segment.
    pub fn connection_url(&self) -> String {
        let base = self.connection.central_system_url.trim_end_matches('/');
        let id = utf8_percent_encode(&self.identity.charge_point_id, PATH_SEGMENT);
        format!("{}/{}", base, id)
    }
}

// ── Central-system side ────────────────────────────────────────

/// Central-system server configuration.
#[derive(Debug, Clone)]
pub struct CentralSystemConfig {
    /// Listen host address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Subprotocols offered during the WebSocket handshake, preferred first.
    pub versions: Vec<OcppVersion>,
    /// Timeout applied to outbound calls towards stations.
    pub call_timeout: Duration,
    /// Optional schema bundle; `None` disables payload validation.
    pub schemas_dir: Option<PathBuf>,
    /// Optional stack database (internal config); `None` keeps the server
    /// stateless.
    pub database_url: Option<String>,
    pub worker_pool_size: usize,
}

impl CentralSystemConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for CentralSystemConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            versions: vec![OcppVersion::V201, OcppVersion::V16],
            call_timeout: Duration::from_secs(30),
            schemas_dir: None,
            database_url: None,
            worker_pool_size: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_url_appends_encoded_id() {
        let mut config = ChargePointConfig::new(
            StationIdentity::new("CP 01/α", "ACME", "X1"),
            "/etc/ocpp/schemas",
        );
        config.connection.central_system_url = "ws://csms.example:9000/ocpp/".into();
        let url = config.connection_url();
        assert!(url.starts_with("ws://csms.example:9000/ocpp/"));
        assert!(!url.ends_with('/'));
        // Space, slash and non-ASCII must be escaped
        assert!(!url.contains(' '));
        assert_eq!(url.matches("/ocpp/").count(), 1);
    }

    #[test]
    fn central_system_address() {
        let config = CentralSystemConfig::new("127.0.0.1", 9500);
        assert_eq!(config.address(), "127.0.0.1:9500");
    }
}
