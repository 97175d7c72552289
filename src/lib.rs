//! # ocpp-stack
//!
//! OCPP 1.6-J / 2.0.1 protocol engine for both sides of the wire: a
//! charge-point runtime embedded in a station and a central-system runtime
//! serving fleets of stations.
//!
//! ## Architecture
//!
//! - **support**: Cross-cutting utilities (errors, shutdown)
//! - **scheduling**: Timer pool and bounded worker pool
//! - **rpc**: OCPP-J framing and the symmetric request/response endpoint
//! - **schemas**: JSON-schema validation per action and direction
//! - **messages**: The closed action sets and extension payload types
//! - **dispatch**: Validate → convert → handle pipeline for both peers
//! - **security**: Security profiles 0-3 and TLS parameter resolution
//! - **transport**: WebSocket client/server glue
//! - **storage**: SQLite persistence (internal config, request FIFO)
//! - **chargepoint**: Station runtimes for 1.6 and 2.0.1 (session FSM,
//!   typed requests)
//! - **centralsystem**: CSMS runtime (server, station proxies)

pub mod chargepoint;
pub mod centralsystem;
pub mod config;
pub mod dispatch;
pub mod messages;
pub mod rpc;
pub mod scheduling;
pub mod schemas;
pub mod security;
pub mod storage;
pub mod support;
pub mod transport;
pub mod version;

// Re-export commonly used types at crate root
pub use chargepoint::{
    BootReason, ChargePoint, ChargePointEventsHandler, ChargingStation,
    ChargingStationEventsHandler, RegistrationStatus, SessionState,
};
pub use centralsystem::{CentralSystem, CentralSystemEventsHandler, StationHandle};
pub use config::{CentralSystemConfig, ChargePointConfig, ConnectionConfig, StationIdentity};
pub use rpc::{CallFailure, RpcErrorCode, RpcFrame, RpcProblem};
pub use security::SecurityProfile;
pub use support::{OcppError, OcppResult};
pub use version::OcppVersion;
