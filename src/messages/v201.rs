//! OCPP 2.0.1 action table

use crate::messages::{MessageDirection, OfflineBehavior, QueueOverflowPolicy};

/// All OCPP 2.0.1 actions known to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V201Action {
    // Charging-station initiated
    Authorize,
    BootNotification,
    ClearedChargingLimit,
    FirmwareStatusNotification,
    Get15118EVCertificate,
    GetCertificateStatus,
    Heartbeat,
    LogStatusNotification,
    MeterValues,
    NotifyChargingLimit,
    NotifyCustomerInformation,
    NotifyDisplayMessages,
    NotifyEVChargingNeeds,
    NotifyEVChargingSchedule,
    NotifyEvent,
    NotifyMonitoringReport,
    NotifyReport,
    PublishFirmwareStatusNotification,
    ReportChargingProfiles,
    ReservationStatusUpdate,
    SecurityEventNotification,
    SignCertificate,
    StatusNotification,
    TransactionEvent,
    // Both directions
    DataTransfer,
    // CSMS initiated
    CancelReservation,
    CertificateSigned,
    ChangeAvailability,
    ClearCache,
    ClearChargingProfile,
    ClearDisplayMessage,
    ClearVariableMonitoring,
    CostUpdated,
    CustomerInformation,
    DeleteCertificate,
    GetBaseReport,
    GetChargingProfiles,
    GetCompositeSchedule,
    GetDisplayMessages,
    GetInstalledCertificateIds,
    GetLocalListVersion,
    GetLog,
    GetMonitoringReport,
    GetReport,
    GetTransactionStatus,
    GetVariables,
    InstallCertificate,
    PublishFirmware,
    RequestStartTransaction,
    RequestStopTransaction,
    ReserveNow,
    Reset,
    SendLocalList,
    SetChargingProfile,
    SetDisplayMessage,
    SetMonitoringBase,
    SetMonitoringLevel,
    SetNetworkProfile,
    SetVariableMonitoring,
    SetVariables,
    TriggerMessage,
    UnlockConnector,
    UnpublishFirmware,
    UpdateFirmware,
}

impl V201Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authorize => "Authorize",
            Self::BootNotification => "BootNotification",
            Self::ClearedChargingLimit => "ClearedChargingLimit",
            Self::FirmwareStatusNotification => "FirmwareStatusNotification",
            Self::Get15118EVCertificate => "Get15118EVCertificate",
            Self::GetCertificateStatus => "GetCertificateStatus",
            Self::Heartbeat => "Heartbeat",
            Self::LogStatusNotification => "LogStatusNotification",
            Self::MeterValues => "MeterValues",
            Self::NotifyChargingLimit => "NotifyChargingLimit",
            Self::NotifyCustomerInformation => "NotifyCustomerInformation",
            Self::NotifyDisplayMessages => "NotifyDisplayMessages",
            Self::NotifyEVChargingNeeds => "NotifyEVChargingNeeds",
            Self::NotifyEVChargingSchedule => "NotifyEVChargingSchedule",
            Self::NotifyEvent => "NotifyEvent",
            Self::NotifyMonitoringReport => "NotifyMonitoringReport",
            Self::NotifyReport => "NotifyReport",
            Self::PublishFirmwareStatusNotification => "PublishFirmwareStatusNotification",
            Self::ReportChargingProfiles => "ReportChargingProfiles",
            Self::ReservationStatusUpdate => "ReservationStatusUpdate",
            Self::SecurityEventNotification => "SecurityEventNotification",
            Self::SignCertificate => "SignCertificate",
            Self::StatusNotification => "StatusNotification",
            Self::TransactionEvent => "TransactionEvent",
            Self::DataTransfer => "DataTransfer",
            Self::CancelReservation => "CancelReservation",
            Self::CertificateSigned => "CertificateSigned",
            Self::ChangeAvailability => "ChangeAvailability",
            Self::ClearCache => "ClearCache",
            Self::ClearChargingProfile => "ClearChargingProfile",
            Self::ClearDisplayMessage => "ClearDisplayMessage",
            Self::ClearVariableMonitoring => "ClearVariableMonitoring",
            Self::CostUpdated => "CostUpdated",
            Self::CustomerInformation => "CustomerInformation",
            Self::DeleteCertificate => "DeleteCertificate",
            Self::GetBaseReport => "GetBaseReport",
            Self::GetChargingProfiles => "GetChargingProfiles",
            Self::GetCompositeSchedule => "GetCompositeSchedule",
            Self::GetDisplayMessages => "GetDisplayMessages",
            Self::GetInstalledCertificateIds => "GetInstalledCertificateIds",
            Self::GetLocalListVersion => "GetLocalListVersion",
            Self::GetLog => "GetLog",
            Self::GetMonitoringReport => "GetMonitoringReport",
            Self::GetReport => "GetReport",
            Self::GetTransactionStatus => "GetTransactionStatus",
            Self::GetVariables => "GetVariables",
            Self::InstallCertificate => "InstallCertificate",
            Self::PublishFirmware => "PublishFirmware",
            Self::RequestStartTransaction => "RequestStartTransaction",
            Self::RequestStopTransaction => "RequestStopTransaction",
            Self::ReserveNow => "ReserveNow",
            Self::Reset => "Reset",
            Self::SendLocalList => "SendLocalList",
            Self::SetChargingProfile => "SetChargingProfile",
            Self::SetDisplayMessage => "SetDisplayMessage",
            Self::SetMonitoringBase => "SetMonitoringBase",
            Self::SetMonitoringLevel => "SetMonitoringLevel",
            Self::SetNetworkProfile => "SetNetworkProfile",
            Self::SetVariableMonitoring => "SetVariableMonitoring",
            Self::SetVariables => "SetVariables",
            Self::TriggerMessage => "TriggerMessage",
            Self::UnlockConnector => "UnlockConnector",
            Self::UnpublishFirmware => "UnpublishFirmware",
            Self::UpdateFirmware => "UpdateFirmware",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub const ALL: &'static [V201Action] = &[
        Self::Authorize,
        Self::BootNotification,
        Self::ClearedChargingLimit,
        Self::FirmwareStatusNotification,
        Self::Get15118EVCertificate,
        Self::GetCertificateStatus,
        Self::Heartbeat,
        Self::LogStatusNotification,
        Self::MeterValues,
        Self::NotifyChargingLimit,
        Self::NotifyCustomerInformation,
        Self::NotifyDisplayMessages,
        Self::NotifyEVChargingNeeds,
        Self::NotifyEVChargingSchedule,
        Self::NotifyEvent,
        Self::NotifyMonitoringReport,
        Self::NotifyReport,
        Self::PublishFirmwareStatusNotification,
        Self::ReportChargingProfiles,
        Self::ReservationStatusUpdate,
        Self::SecurityEventNotification,
        Self::SignCertificate,
        Self::StatusNotification,
        Self::TransactionEvent,
        Self::DataTransfer,
        Self::CancelReservation,
        Self::CertificateSigned,
        Self::ChangeAvailability,
        Self::ClearCache,
        Self::ClearChargingProfile,
        Self::ClearDisplayMessage,
        Self::ClearVariableMonitoring,
        Self::CostUpdated,
        Self::CustomerInformation,
        Self::DeleteCertificate,
        Self::GetBaseReport,
        Self::GetChargingProfiles,
        Self::GetCompositeSchedule,
        Self::GetDisplayMessages,
        Self::GetInstalledCertificateIds,
        Self::GetLocalListVersion,
        Self::GetLog,
        Self::GetMonitoringReport,
        Self::GetReport,
        Self::GetTransactionStatus,
        Self::GetVariables,
        Self::InstallCertificate,
        Self::PublishFirmware,
        Self::RequestStartTransaction,
        Self::RequestStopTransaction,
        Self::ReserveNow,
        Self::Reset,
        Self::SendLocalList,
        Self::SetChargingProfile,
        Self::SetDisplayMessage,
        Self::SetMonitoringBase,
        Self::SetMonitoringLevel,
        Self::SetNetworkProfile,
        Self::SetVariableMonitoring,
        Self::SetVariables,
        Self::TriggerMessage,
        Self::UnlockConnector,
        Self::UnpublishFirmware,
        Self::UpdateFirmware,
    ];

    pub fn direction(&self) -> MessageDirection {
        match self {
            Self::Authorize
            | Self::BootNotification
            | Self::ClearedChargingLimit
            | Self::FirmwareStatusNotification
            | Self::Get15118EVCertificate
            | Self::GetCertificateStatus
            | Self::Heartbeat
            | Self::LogStatusNotification
            | Self::MeterValues
            | Self::NotifyChargingLimit
            | Self::NotifyCustomerInformation
            | Self::NotifyDisplayMessages
            | Self::NotifyEVChargingNeeds
            | Self::NotifyEVChargingSchedule
            | Self::NotifyEvent
            | Self::NotifyMonitoringReport
            | Self::NotifyReport
            | Self::PublishFirmwareStatusNotification
            | Self::ReportChargingProfiles
            | Self::ReservationStatusUpdate
            | Self::SecurityEventNotification
            | Self::SignCertificate
            | Self::StatusNotification
            | Self::TransactionEvent => MessageDirection::ChargePointToCentralSystem,

            Self::DataTransfer => MessageDirection::Both,

            _ => MessageDirection::CentralSystemToChargePoint,
        }
    }

    /// Offline handling for station-initiated traffic.
    pub fn offline_behavior(&self) -> OfflineBehavior {
        match self {
            Self::MeterValues
            | Self::StatusNotification
            | Self::NotifyEvent
            | Self::NotifyReport
            | Self::FirmwareStatusNotification
            | Self::LogStatusNotification => OfflineBehavior::Queue(QueueOverflowPolicy::DropOldest),
            Self::TransactionEvent | Self::SecurityEventNotification => {
                OfflineBehavior::Queue(QueueOverflowPolicy::Reject)
            }
            _ => OfflineBehavior::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrip() {
        for action in V201Action::ALL {
            assert_eq!(V201Action::from_name(action.name()), Some(*action));
        }
    }

    #[test]
    fn transaction_events_reject_on_overflow() {
        assert_eq!(
            V201Action::TransactionEvent.offline_behavior(),
            OfflineBehavior::Queue(QueueOverflowPolicy::Reject)
        );
    }

    #[test]
    fn request_start_is_csms_initiated() {
        assert_eq!(
            V201Action::RequestStartTransaction.direction(),
            MessageDirection::CentralSystemToChargePoint
        );
    }
}
