//! Server-side station sessions
//!
//! One [`ServerSession`] exists per connected charge point, from the
//! completed handshake until the socket closes. The registry serializes
//! concurrent connections per charge-point id: a new connection evicts the
//! old session, whose pending calls complete with `ConnectionLost`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatch::call_typed;
use crate::rpc::RpcEndpoint;
use crate::schemas::SchemaValidator;
use crate::support::{OcppError, OcppResult, ShutdownSignal};
use crate::version::OcppVersion;

// ── ServerSession ──────────────────────────────────────────────

/// One bound station connection.
pub struct ServerSession {
    pub charge_point_id: String,
    pub version: OcppVersion,
    pub endpoint: Arc<RpcEndpoint>,
    pub connected_at: DateTime<Utc>,
    /// Closes this connection's transport tasks.
    pub(crate) shutdown: ShutdownSignal,
}

// ── StationHandle ──────────────────────────────────────────────

/// Cloneable proxy handed to the backend when a station connects.
///
/// The typed command wrappers in `commands::v16` / `commands::v201` hang
/// off this handle.
#[derive(Clone)]
pub struct StationHandle {
    pub(crate) session: Arc<ServerSession>,
    pub(crate) validator: Arc<SchemaValidator>,
    pub(crate) call_timeout: Duration,
}

impl StationHandle {
    pub fn charge_point_id(&self) -> &str {
        &self.session.charge_point_id
    }

    pub fn ocpp_version(&self) -> OcppVersion {
        self.session.version
    }

    pub fn is_connected(&self) -> bool {
        self.session.endpoint.is_connected()
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.session.connected_at
    }

    /// Force-close this station's connection.
    pub fn disconnect(&self) {
        self.session.shutdown.trigger();
    }

    pub(crate) async fn command<Req, Resp>(
        &self,
        expected_version: OcppVersion,
        action: &str,
        request: &Req,
    ) -> OcppResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        if self.session.version != expected_version {
            return Err(OcppError::Configuration(format!(
                "{} is an {} command but {} speaks {}",
                action, expected_version, self.session.charge_point_id, self.session.version
            )));
        }
        Ok(call_typed(
            &self.session.endpoint,
            &self.validator,
            self.session.version,
            action,
            request,
            self.call_timeout,
        )
        .await?)
    }
}

// ── SessionRegistry ────────────────────────────────────────────

/// Outcome of a registration attempt.
pub enum RegisterOutcome {
    /// Fresh connection, no previous session existed.
    New,
    /// An existing session for the same id was closed and replaced.
    Evicted,
}

/// Thread-safe registry of active station sessions.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<ServerSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Bind a new session. An existing session for the same charge point
    /// is closed: its transport shuts down and its pending calls complete
    /// with `ConnectionLost`.
    pub fn register(&self, session: Arc<ServerSession>) -> RegisterOutcome {
        let evicted = self
            .sessions
            .insert(session.charge_point_id.clone(), session.clone());

        match evicted {
            Some(old) => {
                warn!(
                    charge_point_id = old.charge_point_id.as_str(),
                    connected_since = %old.connected_at,
                    "Replacing existing session; closing the old connection"
                );
                old.shutdown.trigger();
                RegisterOutcome::Evicted
            }
            None => {
                info!(
                    charge_point_id = session.charge_point_id.as_str(),
                    version = %session.version,
                    "Station session registered"
                );
                RegisterOutcome::New
            }
        }
    }

    /// Remove a session when its connection dies. Only removes the exact
    /// session instance, so an eviction's replacement is never dropped by
    /// the evicted connection's cleanup.
    pub fn unregister(&self, session: &Arc<ServerSession>) {
        let removed = self
            .sessions
            .remove_if(&session.charge_point_id, |_, current| {
                Arc::ptr_eq(current, session)
            });
        if removed.is_some() {
            info!(
                charge_point_id = session.charge_point_id.as_str(),
                "Station session unregistered"
            );
        }
    }

    pub fn get(&self, charge_point_id: &str) -> Option<Arc<ServerSession>> {
        self.sessions.get(charge_point_id).map(|s| s.clone())
    }

    pub fn is_connected(&self, charge_point_id: &str) -> bool {
        self.sessions.contains_key(charge_point_id)
    }

    pub fn connected_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Close every session (server shutdown).
    pub fn close_all(&self) {
        for entry in self.sessions.iter() {
            entry.value().shutdown.trigger();
        }
        self.sessions.clear();
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::WorkerPool;
    use tokio::sync::mpsc;

    fn session(id: &str) -> Arc<ServerSession> {
        let (tx, _rx) = mpsc::unbounded_channel();
        Arc::new(ServerSession {
            charge_point_id: id.to_string(),
            version: OcppVersion::V16,
            endpoint: RpcEndpoint::new(id, tx, WorkerPool::new(1)),
            connected_at: Utc::now(),
            shutdown: ShutdownSignal::new(),
        })
    }

    #[tokio::test]
    async fn register_and_lookup() {
        let registry = SessionRegistry::new();
        let s = session("CP-1");
        assert!(matches!(registry.register(s.clone()), RegisterOutcome::New));
        assert!(registry.is_connected("CP-1"));
        assert_eq!(registry.count(), 1);
    }

    #[tokio::test]
    async fn second_connection_evicts_first() {
        let registry = SessionRegistry::new();
        let first = session("CP-1");
        let second = session("CP-1");

        registry.register(first.clone());
        assert!(matches!(
            registry.register(second.clone()),
            RegisterOutcome::Evicted
        ));

        // The old connection was told to close
        assert!(first.shutdown.is_triggered());
        assert!(!second.shutdown.is_triggered());
        assert_eq!(registry.count(), 1);

        // Cleanup of the evicted session must not drop the replacement
        registry.unregister(&first);
        assert!(registry.is_connected("CP-1"));
        registry.unregister(&second);
        assert!(!registry.is_connected("CP-1"));
    }
}
