//! Message dispatch pipeline
//!
//! Inbound: schema-validate the request, deserialize through the registry
//! converter, invoke the typed handler, serialize the response and validate
//! it against the response schema. Outbound: serialize, validate, send,
//! deserialize the answer (inbound CallResults are deliberately not
//! schema-validated; converters tolerate missing optional fields).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::messages::{lookup, MessageDirection};
use crate::rpc::{CallFailure, RpcEndpoint, RpcErrorCode, RpcProblem};
use crate::schemas::{Direction, SchemaValidator};
use crate::version::OcppVersion;

/// Which peer this dispatcher is running in; decides which inbound
/// directions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchSide {
    ChargePoint,
    CentralSystem,
}

/// Per-connection dispatch helper shared by both sides of the stack.
pub struct Dispatcher {
    validator: Arc<SchemaValidator>,
    version: OcppVersion,
    side: DispatchSide,
}

impl Dispatcher {
    pub fn new(validator: Arc<SchemaValidator>, version: OcppVersion, side: DispatchSide) -> Self {
        Self {
            validator,
            version,
            side,
        }
    }

    pub fn version(&self) -> OcppVersion {
        self.version
    }

    fn peer_may_initiate(&self, direction: MessageDirection) -> bool {
        match self.side {
            DispatchSide::ChargePoint => direction.central_system_may_initiate(),
            DispatchSide::CentralSystem => direction.charge_point_may_initiate(),
        }
    }

    /// Run one inbound Call through the pipeline. `invoke` receives the
    /// schema-validated payload and returns the raw response payload.
    pub async fn dispatch<F, Fut>(
        &self,
        action: &str,
        payload: Value,
        invoke: F,
    ) -> Result<Value, RpcProblem>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, RpcProblem>>,
    {
        let info = lookup(self.version, action)
            .ok_or_else(|| RpcProblem::not_implemented(action))?;

        if !self.peer_may_initiate(info.direction) {
            warn!(action, "Call received from the wrong side of the connection");
            return Err(RpcProblem::new(
                RpcErrorCode::ProtocolError,
                format!("{} may not be initiated by this peer", action),
            ));
        }

        self.validator
            .validate(self.version, action, Direction::Request, &payload)?;

        let response = invoke(payload).await?;

        if let Err(failure) =
            self.validator
                .validate(self.version, action, Direction::Response, &response)
        {
            warn!(action, failure = %failure, "Handler response failed schema validation");
            return Err(RpcProblem::internal(format!(
                "Response to {} failed validation",
                action
            )));
        }

        Ok(response)
    }
}

/// Deserialize the payload, run the typed handler, serialize its answer.
///
/// Used inside `dispatch` closures so each action keeps one-line routing.
pub async fn typed<Req, Resp, F, Fut>(
    action: &str,
    payload: Value,
    handle: F,
) -> Result<Value, RpcProblem>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Resp, RpcProblem>>,
{
    let request: Req = serde_json::from_value(payload).map_err(|e| {
        RpcProblem::new(
            RpcErrorCode::TypeConstraintViolation,
            format!("{} request: {}", action, e),
        )
    })?;

    let response = handle(request).await?;

    serde_json::to_value(&response)
        .map_err(|e| RpcProblem::internal(format!("{} response: {}", action, e)))
}

/// Issue a typed outbound Call: serialize, validate against the request
/// schema, send, and deserialize the CallResult payload.
///
/// A request failing its own schema never reaches the wire.
pub async fn call_typed<Req, Resp>(
    endpoint: &Arc<RpcEndpoint>,
    validator: &SchemaValidator,
    version: OcppVersion,
    action: &str,
    request: &Req,
    timeout: Duration,
) -> Result<Resp, CallFailure>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let payload = serde_json::to_value(request)
        .map_err(|e| CallFailure::EncodeError(format!("{} request: {}", action, e)))?;

    if let Err(failure) = validator.validate(version, action, Direction::Request, &payload) {
        return Err(CallFailure::EncodeError(format!(
            "{} request failed validation: {}",
            action, failure
        )));
    }

    let response = endpoint.call(action, payload, timeout).await?;

    serde_json::from_value(response)
        .map_err(|e| CallFailure::EncodeError(format!("{} response: {}", action, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator_with_boot() -> Arc<SchemaValidator> {
        let mut v = SchemaValidator::empty();
        v.insert(
            OcppVersion::V16,
            "BootNotification",
            Direction::Request,
            &json!({
                "type": "object",
                "required": ["chargePointVendor", "chargePointModel"]
            }),
        )
        .unwrap();
        v.insert(
            OcppVersion::V16,
            "BootNotification",
            Direction::Response,
            &json!({
                "type": "object",
                "required": ["currentTime", "interval", "status"]
            }),
        )
        .unwrap();
        Arc::new(v)
    }

    #[tokio::test]
    async fn unknown_action_is_not_implemented() {
        let d = Dispatcher::new(
            validator_with_boot(),
            OcppVersion::V16,
            DispatchSide::CentralSystem,
        );
        let err = d
            .dispatch("FooBar", json!({}), |_| async { Ok(json!({})) })
            .await
            .unwrap_err();
        assert_eq!(err.code, RpcErrorCode::NotImplemented);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_handler() {
        let d = Dispatcher::new(
            validator_with_boot(),
            OcppVersion::V16,
            DispatchSide::CentralSystem,
        );
        let err = d
            .dispatch("BootNotification", json!({"chargePointVendor": "only"}), |_| async {
                panic!("handler must not run")
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, RpcErrorCode::OccurenceConstraintViolation);
    }

    #[tokio::test]
    async fn invalid_response_maps_to_internal_error() {
        let d = Dispatcher::new(
            validator_with_boot(),
            OcppVersion::V16,
            DispatchSide::CentralSystem,
        );
        let err = d
            .dispatch(
                "BootNotification",
                json!({"chargePointVendor": "ACME", "chargePointModel": "X1"}),
                |_| async { Ok(json!({"status": "Accepted"})) },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, RpcErrorCode::InternalError);
    }

    #[tokio::test]
    async fn wrong_direction_is_protocol_error() {
        // BootNotification arriving at a charge point
        let d = Dispatcher::new(
            validator_with_boot(),
            OcppVersion::V16,
            DispatchSide::ChargePoint,
        );
        let err = d
            .dispatch(
                "BootNotification",
                json!({"chargePointVendor": "ACME", "chargePointModel": "X1"}),
                |_| async { Ok(json!({})) },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, RpcErrorCode::ProtocolError);
    }

    #[tokio::test]
    async fn valid_roundtrip_passes() {
        let d = Dispatcher::new(
            validator_with_boot(),
            OcppVersion::V16,
            DispatchSide::CentralSystem,
        );
        let response = d
            .dispatch(
                "BootNotification",
                json!({"chargePointVendor": "ACME", "chargePointModel": "X1"}),
                |_| async {
                    Ok(json!({
                        "currentTime": "2024-01-01T00:00:00Z",
                        "interval": 300,
                        "status": "Accepted"
                    }))
                },
            )
            .await
            .unwrap();
        assert_eq!(response["status"], "Accepted");
    }
}
