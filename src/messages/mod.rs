//! Message registry — the closed action sets and their metadata
//!
//! Payload conversion is `serde_json::from_value` / `to_value` over the
//! `rust-ocpp` typed structs (plus the local 1.6 extension structs in
//! [`v16_security`]); the converters are pure and the registry itself is
//! read-only after startup.

pub mod v16;
pub mod v16_security;
pub mod v201;

pub use v16::V16Action;
pub use v201::V201Action;

use crate::version::OcppVersion;

/// Who may initiate an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    ChargePointToCentralSystem,
    CentralSystemToChargePoint,
    Both,
}

impl MessageDirection {
    pub fn charge_point_may_initiate(&self) -> bool {
        matches!(self, Self::ChargePointToCentralSystem | Self::Both)
    }

    pub fn central_system_may_initiate(&self) -> bool {
        matches!(self, Self::CentralSystemToChargePoint | Self::Both)
    }
}

/// FIFO overflow policy selected per action type at enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOverflowPolicy {
    /// Drop the oldest entry with the same action on the same connector
    /// (metering traffic).
    DropOldest,
    /// Refuse the enqueue (transactional traffic).
    Reject,
}

/// What a station-initiated action does while the session is not Accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineBehavior {
    /// Store in the request FIFO for replay after registration.
    Queue(QueueOverflowPolicy),
    /// Fail locally; the operation needs a real-time answer.
    Fail,
}

/// Version-agnostic view of one registered action.
#[derive(Debug, Clone, Copy)]
pub struct ActionInfo {
    pub name: &'static str,
    pub direction: MessageDirection,
    pub offline_behavior: OfflineBehavior,
}

/// Constant-time-ish lookup over the closed action set of one OCPP version.
///
/// `None` means the action is unknown on this version and an inbound Call
/// for it must be answered with `NotImplemented`.
pub fn lookup(version: OcppVersion, action: &str) -> Option<ActionInfo> {
    match version {
        OcppVersion::V16 => V16Action::from_name(action).map(|a| ActionInfo {
            name: a.name(),
            direction: a.direction(),
            offline_behavior: a.offline_behavior(),
        }),
        OcppVersion::V201 => V201Action::from_name(action).map(|a| ActionInfo {
            name: a.name(),
            direction: a.direction(),
            offline_behavior: a.offline_behavior(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_version_scoped() {
        assert!(lookup(OcppVersion::V16, "StartTransaction").is_some());
        assert!(lookup(OcppVersion::V201, "StartTransaction").is_none());
        assert!(lookup(OcppVersion::V201, "TransactionEvent").is_some());
        assert!(lookup(OcppVersion::V16, "FooBar").is_none());
    }
}
