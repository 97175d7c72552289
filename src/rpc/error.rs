//! RPC error codes and call outcomes

use std::fmt;

use thiserror::Error;

// ── RpcErrorCode ───────────────────────────────────────────────

/// The closed set of error codes permitted on the wire in a CallError frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcErrorCode {
    NotImplemented,
    NotSupported,
    InternalError,
    ProtocolError,
    SecurityError,
    FormationViolation,
    PropertyConstraintViolation,
    /// Spelled without the second "r" in every OCPP edition
    OccurenceConstraintViolation,
    TypeConstraintViolation,
    GenericError,
}

impl RpcErrorCode {
    /// Wire representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotImplemented => "NotImplemented",
            Self::NotSupported => "NotSupported",
            Self::InternalError => "InternalError",
            Self::ProtocolError => "ProtocolError",
            Self::SecurityError => "SecurityError",
            Self::FormationViolation => "FormationViolation",
            Self::PropertyConstraintViolation => "PropertyConstraintViolation",
            Self::OccurenceConstraintViolation => "OccurenceConstraintViolation",
            Self::TypeConstraintViolation => "TypeConstraintViolation",
            Self::GenericError => "GenericError",
        }
    }

    /// Parse a wire error code. Unknown strings map to `GenericError` so a
    /// peer using a non-standard code still completes the pending call.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "NotImplemented" => Self::NotImplemented,
            "NotSupported" => Self::NotSupported,
            "InternalError" => Self::InternalError,
            "ProtocolError" => Self::ProtocolError,
            "SecurityError" => Self::SecurityError,
            "FormationViolation" => Self::FormationViolation,
            "PropertyConstraintViolation" => Self::PropertyConstraintViolation,
            "OccurenceConstraintViolation" => Self::OccurenceConstraintViolation,
            "TypeConstraintViolation" => Self::TypeConstraintViolation,
            _ => Self::GenericError,
        }
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RpcProblem ─────────────────────────────────────────────────

/// An error pair a handler returns to decline or fail an inbound Call.
///
/// Serialized as `[4, id, code, description, {}]` on the wire.
#[derive(Debug, Clone)]
pub struct RpcProblem {
    pub code: RpcErrorCode,
    pub description: String,
}

impl RpcProblem {
    pub fn new(code: RpcErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    pub fn not_implemented(action: &str) -> Self {
        Self::new(RpcErrorCode::NotImplemented, format!("Unknown action: {}", action))
    }

    pub fn not_supported(action: &str) -> Self {
        Self::new(
            RpcErrorCode::NotSupported,
            format!("Action not supported: {}", action),
        )
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::InternalError, description)
    }

    pub fn formation(description: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::FormationViolation, description)
    }
}

// ── CallFailure ────────────────────────────────────────────────

/// Terminal outcome of an outbound `call()` that did not produce a
/// CallResult payload.
#[derive(Debug, Clone, Error)]
pub enum CallFailure {
    /// No response within the configured timeout. The pending entry is
    /// removed; a late response is dropped.
    #[error("Response timeout")]
    Timeout,

    /// The peer answered with a CallError frame.
    #[error("CallError {code}: {description}")]
    PeerError {
        code: RpcErrorCode,
        description: String,
    },

    /// The connection dropped while the call was pending (or the frame
    /// could not be handed to the transport).
    #[error("Connection lost")]
    ConnectionLost,

    /// The endpoint was not connected when the call was issued.
    #[error("Not connected")]
    NotConnected,

    /// The request payload could not be serialized into a frame.
    #[error("Encode error: {0}")]
    EncodeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_code_roundtrip() {
        let codes = [
            RpcErrorCode::NotImplemented,
            RpcErrorCode::NotSupported,
            RpcErrorCode::InternalError,
            RpcErrorCode::ProtocolError,
            RpcErrorCode::SecurityError,
            RpcErrorCode::FormationViolation,
            RpcErrorCode::PropertyConstraintViolation,
            RpcErrorCode::OccurenceConstraintViolation,
            RpcErrorCode::TypeConstraintViolation,
            RpcErrorCode::GenericError,
        ];
        for code in codes {
            assert_eq!(RpcErrorCode::from_wire(code.as_str()), code);
        }
    }

    #[test]
    fn unknown_wire_code_is_generic() {
        assert_eq!(
            RpcErrorCode::from_wire("SomethingVendorSpecific"),
            RpcErrorCode::GenericError
        );
    }
}
