//! Symmetric RPC endpoint
//!
//! Multiplexes outbound Calls with inbound Calls over a single WebSocket
//! connection, matches responses to requests by unique id and enforces
//! per-call timeouts. Used unchanged by both the charge-point and the
//! central-system side; only the transport glue differs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::rpc::error::{CallFailure, RpcErrorCode, RpcProblem};
use crate::rpc::frame::RpcFrame;
use crate::scheduling::WorkerPool;

// ── Listener / spy traits ──────────────────────────────────────

/// Receiver of inbound CALL frames and connection-level events.
///
/// `call_received` is invoked on a worker task, never on the transport
/// reader, so a slow handler cannot stall frame reception.
#[async_trait]
pub trait RpcListener: Send + Sync {
    /// Handle an inbound Call. `Ok` becomes a CallResult, `Err` a CallError
    /// on the same unique id.
    async fn call_received(&self, action: &str, payload: Value) -> Result<Value, RpcProblem>;

    /// The transport dropped; every pending call has already been completed
    /// with [`CallFailure::ConnectionLost`].
    async fn disconnected(&self);

    /// A frame arrived that could not be parsed and could not be answered.
    async fn transport_error(&self, detail: String) {
        let _ = detail;
    }
}

/// Observer of the exact message text sent and received on the connection.
pub trait RpcSpy: Send + Sync {
    fn message_received(&self, text: &str);
    fn message_sent(&self, text: &str);
}

/// Handle returned by [`RpcEndpoint::register_spy`]; pass it back to
/// [`RpcEndpoint::unregister_spy`] to stop observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpyHandle(u64);

// ── RpcEndpoint ────────────────────────────────────────────────

struct PendingCall {
    action: String,
    response_sender: oneshot::Sender<Result<Value, CallFailure>>,
}

/// One endpoint of an OCPP-J RPC connection.
pub struct RpcEndpoint {
    /// Identity used in logs: charge-point id (server side) or the
    /// connection URL host (client side).
    label: String,
    /// Single serialization point for outbound text; drained by the
    /// transport writer task.
    writer: mpsc::UnboundedSender<String>,
    pending: DashMap<String, PendingCall>,
    /// Inbound Call ids currently being handled; a duplicate id while the
    /// first is in flight is a ProtocolError.
    inbound_in_flight: DashMap<String, ()>,
    message_counter: AtomicU64,
    connected: AtomicBool,
    listener: RwLock<Option<Arc<dyn RpcListener>>>,
    spies: RwLock<Vec<(u64, Arc<dyn RpcSpy>)>>,
    spy_counter: AtomicU64,
    workers: Arc<WorkerPool>,
    last_sent_at: Mutex<Instant>,
}

impl RpcEndpoint {
    /// Create an endpoint writing outbound text into `writer`. The transport
    /// glue owns the matching receiver and the actual WebSocket.
    pub fn new(
        label: impl Into<String>,
        writer: mpsc::UnboundedSender<String>,
        workers: Arc<WorkerPool>,
    ) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            writer,
            pending: DashMap::new(),
            inbound_in_flight: DashMap::new(),
            message_counter: AtomicU64::new(1),
            connected: AtomicBool::new(true),
            listener: RwLock::new(None),
            spies: RwLock::new(Vec::new()),
            spy_counter: AtomicU64::new(1),
            workers,
            last_sent_at: Mutex::new(Instant::now()),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Instant of the last outbound frame. The heartbeat timer consults this
    /// so heartbeats never preempt live traffic.
    pub fn last_sent_at(&self) -> Instant {
        *self.last_sent_at.lock().unwrap()
    }

    pub fn set_listener(&self, listener: Arc<dyn RpcListener>) {
        *self.listener.write().unwrap() = Some(listener);
    }

    pub fn register_spy(&self, spy: Arc<dyn RpcSpy>) -> SpyHandle {
        let id = self.spy_counter.fetch_add(1, Ordering::SeqCst);
        self.spies.write().unwrap().push((id, spy));
        SpyHandle(id)
    }

    pub fn unregister_spy(&self, handle: SpyHandle) {
        self.spies.write().unwrap().retain(|(id, _)| *id != handle.0);
    }

    fn generate_message_id(&self) -> String {
        self.message_counter.fetch_add(1, Ordering::SeqCst).to_string()
    }

    // ── Outbound ───────────────────────────────────────────

    /// Issue a Call and wait for the matching CallResult/CallError, a
    /// timeout, or connection loss.
    pub async fn call(
        &self,
        action: &str,
        payload: Value,
        call_timeout: Duration,
    ) -> Result<Value, CallFailure> {
        if !self.is_connected() {
            return Err(CallFailure::NotConnected);
        }

        let message_id = self.generate_message_id();
        let frame = RpcFrame::Call {
            unique_id: message_id.clone(),
            action: action.to_string(),
            payload,
        };

        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            message_id.clone(),
            PendingCall {
                action: action.to_string(),
                response_sender: tx,
            },
        );

        debug!(
            endpoint = self.label.as_str(),
            action,
            message_id = message_id.as_str(),
            "Sending call"
        );

        if self.send_text(frame.serialize()).is_err() {
            self.pending.remove(&message_id);
            return Err(CallFailure::ConnectionLost);
        }

        match timeout(call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                // Completion sink dropped without an answer
                self.pending.remove(&message_id);
                Err(CallFailure::ConnectionLost)
            }
            Err(_) => {
                self.pending.remove(&message_id);
                warn!(
                    endpoint = self.label.as_str(),
                    action,
                    message_id = message_id.as_str(),
                    "Call timed out"
                );
                Err(CallFailure::Timeout)
            }
        }
    }

    /// Enqueue a frame for transmission, notifying spies.
    fn send_text(&self, text: String) -> Result<(), CallFailure> {
        for (_, spy) in self.spies.read().unwrap().iter() {
            spy.message_sent(&text);
        }
        *self.last_sent_at.lock().unwrap() = Instant::now();
        self.writer
            .send(text)
            .map_err(|_| CallFailure::ConnectionLost)
    }

    // ── Inbound ────────────────────────────────────────────

    /// Process one inbound text frame. Called by the transport reader task.
    pub async fn process_incoming(self: &Arc<Self>, text: &str) {
        for (_, spy) in self.spies.read().unwrap().iter() {
            spy.message_received(text);
        }

        match RpcFrame::parse(text) {
            Ok(RpcFrame::Call {
                unique_id,
                action,
                payload,
            }) => self.handle_inbound_call(unique_id, action, payload),
            Ok(RpcFrame::CallResult { unique_id, payload }) => {
                self.complete_pending(&unique_id, Ok(payload));
            }
            Ok(RpcFrame::CallError {
                unique_id,
                error_code,
                error_description,
                ..
            }) => {
                self.complete_pending(
                    &unique_id,
                    Err(CallFailure::PeerError {
                        code: RpcErrorCode::from_wire(&error_code),
                        description: error_description,
                    }),
                );
            }
            Err(e) => {
                if let Some(id) = RpcFrame::recover_id(text) {
                    warn!(
                        endpoint = self.label.as_str(),
                        error = %e,
                        "Malformed call frame; answering FormationViolation"
                    );
                    let _ = self.send_text(
                        RpcFrame::error_response(
                            id,
                            RpcErrorCode::FormationViolation.as_str(),
                            e.to_string(),
                        )
                        .serialize(),
                    );
                } else {
                    warn!(endpoint = self.label.as_str(), error = %e, "Unparseable frame dropped");
                    let listener = self.listener.read().unwrap().clone();
                    if let Some(listener) = listener {
                        let detail = e.to_string();
                        self.workers.spawn(async move {
                            listener.transport_error(detail).await;
                        });
                    }
                }
            }
        }
    }

    fn handle_inbound_call(self: &Arc<Self>, unique_id: String, action: String, payload: Value) {
        if self
            .inbound_in_flight
            .insert(unique_id.clone(), ())
            .is_some()
        {
            warn!(
                endpoint = self.label.as_str(),
                message_id = unique_id.as_str(),
                "Duplicate call id while previous still pending"
            );
            let _ = self.send_text(
                RpcFrame::error_response(
                    unique_id,
                    RpcErrorCode::ProtocolError.as_str(),
                    "Duplicate message id",
                )
                .serialize(),
            );
            return;
        }

        let listener = self.listener.read().unwrap().clone();
        let endpoint = self.clone();
        let action_for_log = action.clone();
        let accepted = self.workers.spawn(async move {
            let reply = match listener {
                Some(listener) => listener.call_received(&action, payload).await,
                None => Err(RpcProblem::internal("No message listener registered")),
            };

            let frame = match reply {
                Ok(response) => RpcFrame::CallResult {
                    unique_id: unique_id.clone(),
                    payload: response,
                },
                Err(problem) => RpcFrame::CallError {
                    unique_id: unique_id.clone(),
                    error_code: problem.code.as_str().to_string(),
                    error_description: problem.description,
                    error_details: Value::Object(Default::default()),
                },
            };
            let _ = endpoint.send_text(frame.serialize());
            endpoint.inbound_in_flight.remove(&unique_id);
        });

        if !accepted {
            warn!(
                endpoint = self.label.as_str(),
                action = action_for_log.as_str(),
                "Worker pool rejected inbound call"
            );
        }
    }

    fn complete_pending(&self, unique_id: &str, outcome: Result<Value, CallFailure>) {
        match self.pending.remove(unique_id) {
            Some((_, pending)) => {
                debug!(
                    endpoint = self.label.as_str(),
                    action = pending.action.as_str(),
                    message_id = unique_id,
                    "Received response"
                );
                let _ = pending.response_sender.send(outcome);
            }
            None => {
                // Late response after timeout, or a peer inventing ids
                debug!(
                    endpoint = self.label.as_str(),
                    message_id = unique_id,
                    "Response for unknown call dropped"
                );
            }
        }
    }

    // ── Connection lifecycle ───────────────────────────────

    /// Mark the transport as gone: fail every pending call with
    /// `ConnectionLost` and notify the listener once.
    pub async fn transport_closed(self: &Arc<Self>) {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return;
        }

        info!(endpoint = self.label.as_str(), "RPC connection closed");

        let ids: Vec<String> = self.pending.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            self.complete_pending(&id, Err(CallFailure::ConnectionLost));
        }

        let listener = self.listener.read().unwrap().clone();
        if let Some(listener) = listener {
            listener.disconnected().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoListener;

    #[async_trait]
    impl RpcListener for EchoListener {
        async fn call_received(&self, action: &str, payload: Value) -> Result<Value, RpcProblem> {
            match action {
                "Heartbeat" => Ok(json!({"currentTime": "2024-01-01T00:00:00Z"})),
                "Echo" => Ok(payload),
                _ => Err(RpcProblem::not_implemented(action)),
            }
        }

        async fn disconnected(&self) {}
    }

    fn endpoint() -> (Arc<RpcEndpoint>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ep = RpcEndpoint::new("test", tx, WorkerPool::new(2));
        (ep, rx)
    }

    #[tokio::test]
    async fn call_completes_with_result() {
        let (ep, mut rx) = endpoint();

        let responder = ep.clone();
        let caller = tokio::spawn({
            let ep = ep.clone();
            async move { ep.call("Heartbeat", json!({}), Duration::from_secs(1)).await }
        });

        let sent = rx.recv().await.unwrap();
        let frame = RpcFrame::parse(&sent).unwrap();
        let id = frame.unique_id().to_string();
        responder
            .process_incoming(&format!(r#"[3,"{}",{{"currentTime":"2024-01-01T00:00:00Z"}}]"#, id))
            .await;

        let result = caller.await.unwrap().unwrap();
        assert_eq!(result["currentTime"], "2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn call_error_surfaces_peer_error() {
        let (ep, mut rx) = endpoint();

        let responder = ep.clone();
        let caller = tokio::spawn({
            let ep = ep.clone();
            async move { ep.call("Reset", json!({}), Duration::from_secs(1)).await }
        });

        let sent = rx.recv().await.unwrap();
        let id = RpcFrame::parse(&sent).unwrap().unique_id().to_string();
        responder
            .process_incoming(&format!(r#"[4,"{}","NotSupported","no",{{}}]"#, id))
            .await;

        match caller.await.unwrap() {
            Err(CallFailure::PeerError { code, .. }) => {
                assert_eq!(code, RpcErrorCode::NotSupported)
            }
            other => panic!("Expected PeerError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn timeout_then_late_response_is_dropped() {
        let (ep, mut rx) = endpoint();

        let result = ep.call("Heartbeat", json!({}), Duration::from_millis(20)).await;
        assert!(matches!(result, Err(CallFailure::Timeout)));

        let sent = rx.recv().await.unwrap();
        let id = RpcFrame::parse(&sent).unwrap().unique_id().to_string();
        // Late response: no pending entry left, must be ignored without panic
        ep.process_incoming(&format!(r#"[3,"{}",{{}}]"#, id)).await;
        assert!(ep.pending.is_empty());
    }

    #[tokio::test]
    async fn outbound_ids_are_unique_and_decimal() {
        let (ep, mut rx) = endpoint();

        for _ in 0..3 {
            let ep2 = ep.clone();
            tokio::spawn(async move {
                let _ = ep2.call("Heartbeat", json!({}), Duration::from_millis(50)).await;
            });
        }

        let mut seen = std::collections::HashSet::new();
        for _ in 0..3 {
            let sent = rx.recv().await.unwrap();
            let id = RpcFrame::parse(&sent).unwrap().unique_id().to_string();
            assert!(id.parse::<u64>().is_ok());
            assert!(seen.insert(id));
        }
    }

    #[tokio::test]
    async fn inbound_call_gets_call_result() {
        let (ep, mut rx) = endpoint();
        ep.set_listener(Arc::new(EchoListener));

        ep.process_incoming(r#"[2,"42","Heartbeat",{}]"#).await;

        let sent = rx.recv().await.unwrap();
        match RpcFrame::parse(&sent).unwrap() {
            RpcFrame::CallResult { unique_id, payload } => {
                assert_eq!(unique_id, "42");
                assert_eq!(payload["currentTime"], "2024-01-01T00:00:00Z");
            }
            other => panic!("Expected CallResult, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_action_gets_not_implemented() {
        let (ep, mut rx) = endpoint();
        ep.set_listener(Arc::new(EchoListener));

        ep.process_incoming(r#"[2,"42","FooBar",{}]"#).await;

        let sent = rx.recv().await.unwrap();
        match RpcFrame::parse(&sent).unwrap() {
            RpcFrame::CallError {
                unique_id,
                error_code,
                ..
            } => {
                assert_eq!(unique_id, "42");
                assert_eq!(error_code, "NotImplemented");
            }
            other => panic!("Expected CallError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_call_with_recoverable_id_gets_formation_violation() {
        let (ep, mut rx) = endpoint();
        ep.set_listener(Arc::new(EchoListener));

        // Payload is not an object
        ep.process_incoming(r#"[2,"7","Heartbeat",3]"#).await;

        let sent = rx.recv().await.unwrap();
        match RpcFrame::parse(&sent).unwrap() {
            RpcFrame::CallError {
                unique_id,
                error_code,
                ..
            } => {
                assert_eq!(unique_id, "7");
                assert_eq!(error_code, "FormationViolation");
            }
            other => panic!("Expected CallError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn garbage_without_id_is_dropped() {
        let (ep, mut rx) = endpoint();
        ep.set_listener(Arc::new(EchoListener));

        ep.process_incoming("this is not json").await;
        ep.process_incoming(r#"{"an":"object"}"#).await;

        // Nothing may be transmitted in response
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn duplicate_inbound_id_is_protocol_error() {
        let (ep, mut rx) = endpoint();

        struct SlowListener;
        #[async_trait]
        impl RpcListener for SlowListener {
            async fn call_received(&self, _: &str, _: Value) -> Result<Value, RpcProblem> {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(json!({}))
            }
            async fn disconnected(&self) {}
        }
        ep.set_listener(Arc::new(SlowListener));

        ep.process_incoming(r#"[2,"9","Heartbeat",{}]"#).await;
        ep.process_incoming(r#"[2,"9","Heartbeat",{}]"#).await;

        let first = rx.recv().await.unwrap();
        match RpcFrame::parse(&first).unwrap() {
            RpcFrame::CallError { error_code, .. } => assert_eq!(error_code, "ProtocolError"),
            other => panic!("Expected ProtocolError first, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_loss_completes_pending_calls() {
        let (ep, mut rx) = endpoint();

        let caller = tokio::spawn({
            let ep = ep.clone();
            async move { ep.call("Heartbeat", json!({}), Duration::from_secs(5)).await }
        });
        let _ = rx.recv().await.unwrap();

        ep.transport_closed().await;

        assert!(matches!(
            caller.await.unwrap(),
            Err(CallFailure::ConnectionLost)
        ));
        assert!(!ep.is_connected());

        // Further calls fail immediately
        assert!(matches!(
            ep.call("Heartbeat", json!({}), Duration::from_secs(1)).await,
            Err(CallFailure::NotConnected)
        ));
    }

    #[tokio::test]
    async fn spies_observe_exact_text() {
        let (ep, mut rx) = endpoint();
        ep.set_listener(Arc::new(EchoListener));

        struct Recorder {
            seen: std::sync::Mutex<Vec<(bool, String)>>,
        }
        impl RpcSpy for Recorder {
            fn message_received(&self, text: &str) {
                self.seen.lock().unwrap().push((true, text.to_string()));
            }
            fn message_sent(&self, text: &str) {
                self.seen.lock().unwrap().push((false, text.to_string()));
            }
        }

        let recorder = Arc::new(Recorder {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let handle = ep.register_spy(recorder.clone());

        let inbound = r#"[2,"5","Heartbeat",{}]"#;
        ep.process_incoming(inbound).await;
        let outbound = rx.recv().await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert!(seen.contains(&(true, inbound.to_string())));
        assert!(seen.contains(&(false, outbound.clone())));
        drop(seen);

        ep.unregister_spy(handle);
        ep.process_incoming(r#"[2,"6","Heartbeat",{}]"#).await;
        let _ = rx.recv().await.unwrap();
        // No new records after unregister
        assert_eq!(
            recorder
                .seen
                .lock()
                .unwrap()
                .iter()
                .filter(|(rx_side, _)| *rx_side)
                .count(),
            1
        );
    }
}
