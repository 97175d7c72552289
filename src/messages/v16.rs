//! OCPP 1.6 action table
//!
//! The closed set of OCPP 1.6 actions, including the security-whitepaper
//! and ISO 15118 (Plug-and-Charge) extensions. Unknown inbound actions are
//! answered with a `NotImplemented` CallError before any dispatch happens.

use crate::messages::{MessageDirection, OfflineBehavior, QueueOverflowPolicy};

/// All OCPP 1.6 actions known to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V16Action {
    // Core profile — charge-point initiated
    Authorize,
    BootNotification,
    DiagnosticsStatusNotification,
    FirmwareStatusNotification,
    Heartbeat,
    MeterValues,
    StartTransaction,
    StatusNotification,
    StopTransaction,
    // Core profile — both directions
    DataTransfer,
    // Core profile — central-system initiated
    CancelReservation,
    ChangeAvailability,
    ChangeConfiguration,
    ClearCache,
    ClearChargingProfile,
    GetCompositeSchedule,
    GetConfiguration,
    GetDiagnostics,
    GetLocalListVersion,
    RemoteStartTransaction,
    RemoteStopTransaction,
    ReserveNow,
    Reset,
    SendLocalList,
    SetChargingProfile,
    TriggerMessage,
    UnlockConnector,
    UpdateFirmware,
    // Security whitepaper — charge-point initiated
    LogStatusNotification,
    SecurityEventNotification,
    SignCertificate,
    SignedFirmwareStatusNotification,
    // Security whitepaper — central-system initiated
    CertificateSigned,
    DeleteCertificate,
    ExtendedTriggerMessage,
    GetInstalledCertificateIds,
    GetLog,
    InstallCertificate,
    SignedUpdateFirmware,
    // ISO 15118 (Plug-and-Charge) extension
    Get15118EVCertificate,
    GetCertificateStatus,
    Iso15118GetInstalledCertificateIds,
    Iso15118InstallCertificate,
    Iso15118TriggerMessage,
}

impl V16Action {
    /// Wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authorize => "Authorize",
            Self::BootNotification => "BootNotification",
            Self::DiagnosticsStatusNotification => "DiagnosticsStatusNotification",
            Self::FirmwareStatusNotification => "FirmwareStatusNotification",
            Self::Heartbeat => "Heartbeat",
            Self::MeterValues => "MeterValues",
            Self::StartTransaction => "StartTransaction",
            Self::StatusNotification => "StatusNotification",
            Self::StopTransaction => "StopTransaction",
            Self::DataTransfer => "DataTransfer",
            Self::CancelReservation => "CancelReservation",
            Self::ChangeAvailability => "ChangeAvailability",
            Self::ChangeConfiguration => "ChangeConfiguration",
            Self::ClearCache => "ClearCache",
            Self::ClearChargingProfile => "ClearChargingProfile",
            Self::GetCompositeSchedule => "GetCompositeSchedule",
            Self::GetConfiguration => "GetConfiguration",
            Self::GetDiagnostics => "GetDiagnostics",
            Self::GetLocalListVersion => "GetLocalListVersion",
            Self::RemoteStartTransaction => "RemoteStartTransaction",
            Self::RemoteStopTransaction => "RemoteStopTransaction",
            Self::ReserveNow => "ReserveNow",
            Self::Reset => "Reset",
            Self::SendLocalList => "SendLocalList",
            Self::SetChargingProfile => "SetChargingProfile",
            Self::TriggerMessage => "TriggerMessage",
            Self::UnlockConnector => "UnlockConnector",
            Self::UpdateFirmware => "UpdateFirmware",
            Self::LogStatusNotification => "LogStatusNotification",
            Self::SecurityEventNotification => "SecurityEventNotification",
            Self::SignCertificate => "SignCertificate",
            Self::SignedFirmwareStatusNotification => "SignedFirmwareStatusNotification",
            Self::CertificateSigned => "CertificateSigned",
            Self::DeleteCertificate => "DeleteCertificate",
            Self::ExtendedTriggerMessage => "ExtendedTriggerMessage",
            Self::GetInstalledCertificateIds => "GetInstalledCertificateIds",
            Self::GetLog => "GetLog",
            Self::InstallCertificate => "InstallCertificate",
            Self::SignedUpdateFirmware => "SignedUpdateFirmware",
            Self::Get15118EVCertificate => "Get15118EVCertificate",
            Self::GetCertificateStatus => "GetCertificateStatus",
            Self::Iso15118GetInstalledCertificateIds => "Iso15118GetInstalledCertificateIds",
            Self::Iso15118InstallCertificate => "Iso15118InstallCertificate",
            Self::Iso15118TriggerMessage => "Iso15118TriggerMessage",
        }
    }

    /// Parse a case-exact wire action name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub const ALL: &'static [V16Action] = &[
        Self::Authorize,
        Self::BootNotification,
        Self::DiagnosticsStatusNotification,
        Self::FirmwareStatusNotification,
        Self::Heartbeat,
        Self::MeterValues,
        Self::StartTransaction,
        Self::StatusNotification,
        Self::StopTransaction,
        Self::DataTransfer,
        Self::CancelReservation,
        Self::ChangeAvailability,
        Self::ChangeConfiguration,
        Self::ClearCache,
        Self::ClearChargingProfile,
        Self::GetCompositeSchedule,
        Self::GetConfiguration,
        Self::GetDiagnostics,
        Self::GetLocalListVersion,
        Self::RemoteStartTransaction,
        Self::RemoteStopTransaction,
        Self::ReserveNow,
        Self::Reset,
        Self::SendLocalList,
        Self::SetChargingProfile,
        Self::TriggerMessage,
        Self::UnlockConnector,
        Self::UpdateFirmware,
        Self::LogStatusNotification,
        Self::SecurityEventNotification,
        Self::SignCertificate,
        Self::SignedFirmwareStatusNotification,
        Self::CertificateSigned,
        Self::DeleteCertificate,
        Self::ExtendedTriggerMessage,
        Self::GetInstalledCertificateIds,
        Self::GetLog,
        Self::InstallCertificate,
        Self::SignedUpdateFirmware,
        Self::Get15118EVCertificate,
        Self::GetCertificateStatus,
        Self::Iso15118GetInstalledCertificateIds,
        Self::Iso15118InstallCertificate,
        Self::Iso15118TriggerMessage,
    ];

    /// Which side of the connection may initiate this action.
    pub fn direction(&self) -> MessageDirection {
        match self {
            Self::Authorize
            | Self::BootNotification
            | Self::DiagnosticsStatusNotification
            | Self::FirmwareStatusNotification
            | Self::Heartbeat
            | Self::MeterValues
            | Self::StartTransaction
            | Self::StatusNotification
            | Self::StopTransaction
            | Self::LogStatusNotification
            | Self::SecurityEventNotification
            | Self::SignCertificate
            | Self::SignedFirmwareStatusNotification
            | Self::Get15118EVCertificate
            | Self::GetCertificateStatus => MessageDirection::ChargePointToCentralSystem,

            Self::DataTransfer => MessageDirection::Both,

            _ => MessageDirection::CentralSystemToChargePoint,
        }
    }

    /// What the charge point does with this action while not Accepted.
    pub fn offline_behavior(&self) -> OfflineBehavior {
        match self {
            // Metering-style traffic: old samples lose value, keep the queue moving
            Self::MeterValues | Self::StatusNotification | Self::DiagnosticsStatusNotification
            | Self::FirmwareStatusNotification | Self::LogStatusNotification
            | Self::SignedFirmwareStatusNotification => {
                OfflineBehavior::Queue(QueueOverflowPolicy::DropOldest)
            }
            // Transactional traffic must never be silently discarded
            Self::StartTransaction | Self::StopTransaction | Self::SecurityEventNotification => {
                OfflineBehavior::Queue(QueueOverflowPolicy::Reject)
            }
            // Everything else needs a live peer
            _ => OfflineBehavior::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrip() {
        for action in V16Action::ALL {
            assert_eq!(V16Action::from_name(action.name()), Some(*action));
        }
    }

    #[test]
    fn lookup_is_case_exact() {
        assert_eq!(V16Action::from_name("bootnotification"), None);
        assert_eq!(V16Action::from_name("BOOTNOTIFICATION"), None);
        assert_eq!(
            V16Action::from_name("BootNotification"),
            Some(V16Action::BootNotification)
        );
    }

    #[test]
    fn unknown_action_is_none() {
        assert_eq!(V16Action::from_name("FooBar"), None);
    }

    #[test]
    fn data_transfer_flows_both_ways() {
        assert_eq!(V16Action::DataTransfer.direction(), MessageDirection::Both);
    }

    #[test]
    fn transactions_queue_with_reject_policy() {
        assert_eq!(
            V16Action::StartTransaction.offline_behavior(),
            OfflineBehavior::Queue(QueueOverflowPolicy::Reject)
        );
        assert_eq!(
            V16Action::MeterValues.offline_behavior(),
            OfflineBehavior::Queue(QueueOverflowPolicy::DropOldest)
        );
        assert_eq!(V16Action::Authorize.offline_behavior(), OfflineBehavior::Fail);
    }
}
