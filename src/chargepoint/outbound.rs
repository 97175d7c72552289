//! Outbound send-or-queue gate
//!
//! Version-agnostic core behind the typed request wrappers of both
//! station runtimes: validate the payload, send it live on an Accepted
//! session, or store it in the request FIFO under the action's offline
//! policy.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::messages::{OfflineBehavior, QueueOverflowPolicy};
use crate::rpc::CallFailure;
use crate::schemas::Direction;
use crate::storage::FifoError;
use crate::support::{OcppError, OcppResult};

use super::session::SessionShared;

/// A request failing its own schema never reaches the wire (or the queue).
fn validate_outbound(shared: &SessionShared, action: &str, payload: &Value) -> OcppResult<()> {
    shared
        .validator
        .validate(
            shared.config.connection.ocpp_version,
            action,
            Direction::Request,
            payload,
        )
        .map_err(|f| {
            OcppError::Call(CallFailure::EncodeError(format!(
                "{} request failed validation: {}",
                action, f
            )))
        })
}

/// Send an action live, or queue it under the offline policy.
///
/// `Ok(Some(response))` for a live round-trip, `Ok(None)` when the request
/// was queued for replay.
pub(crate) async fn send_or_queue(
    shared: &Arc<SessionShared>,
    connector_id: u32,
    action: &str,
    behavior: OfflineBehavior,
    payload: Value,
) -> OcppResult<Option<Value>> {
    validate_outbound(shared, action, &payload)?;

    // While a replay is draining the FIFO, queueable traffic joins the
    // queue so the enqueue order stays the transmit order
    let replay_active = shared.replaying.load(Ordering::SeqCst);

    if shared.may_send_live() && !replay_active {
        let endpoint = shared.current_endpoint().ok_or(OcppError::NotConnected)?;
        match endpoint
            .call(
                action,
                payload.clone(),
                shared.config.connection.call_timeout,
            )
            .await
        {
            Ok(response) => return Ok(Some(response)),
            Err(CallFailure::ConnectionLost) | Err(CallFailure::NotConnected) => {
                // Fall through to the offline policy below
                warn!(action, "Connection lost mid-send");
            }
            Err(e) => return Err(e.into()),
        }
    }

    match behavior {
        OfflineBehavior::Queue(policy) if shared.offline_allowed() => {
            let sequence = enqueue(shared, connector_id, action, &payload, policy).await?;
            info!(action, connector_id, sequence, "Request queued for replay");
            Ok(None)
        }
        OfflineBehavior::Queue(_) => Err(OcppError::NotAllowed),
        OfflineBehavior::Fail => Err(OcppError::NotConnected),
    }
}

async fn enqueue(
    shared: &Arc<SessionShared>,
    connector_id: u32,
    action: &str,
    payload: &Value,
    policy: QueueOverflowPolicy,
) -> OcppResult<i64> {
    shared
        .fifo
        .enqueue(connector_id as i32, action, payload, policy)
        .await
        .map_err(|e| match e {
            FifoError::Full { .. } => OcppError::QueueFull,
            other => {
                error!(error = %other, "FIFO enqueue failed");
                OcppError::Storage(other.to_string())
            }
        })
}

/// Outbound request that needs a live, Accepted session.
pub(crate) async fn call_live(
    shared: &Arc<SessionShared>,
    action: &str,
    payload: Value,
) -> OcppResult<Value> {
    validate_outbound(shared, action, &payload)?;
    if !shared.may_send_live() {
        return Err(OcppError::NotConnected);
    }
    let endpoint = shared.current_endpoint().ok_or(OcppError::NotConnected)?;
    Ok(endpoint
        .call(action, payload, shared.config.connection.call_timeout)
        .await?)
}
