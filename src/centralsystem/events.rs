//! Central-system events handler
//!
//! The backend implements this trait to admit stations, verify their
//! credentials and process station-initiated traffic. Defaults implement a
//! permissive development backend: everything connects, every tag
//! authorizes, notifications are acknowledged. Production deployments
//! override what matters to them.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::Utc;

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};
use rust_ocpp::v1_6::messages::data_transfer::{DataTransferRequest, DataTransferResponse};
use rust_ocpp::v1_6::messages::diagnostics_status_notification::{
    DiagnosticsStatusNotificationRequest, DiagnosticsStatusNotificationResponse,
};
use rust_ocpp::v1_6::messages::firmware_status_notification::{
    FirmwareStatusNotificationRequest, FirmwareStatusNotificationResponse,
};
use rust_ocpp::v1_6::messages::meter_values::{MeterValuesRequest, MeterValuesResponse};
use rust_ocpp::v1_6::messages::start_transaction::{
    StartTransactionRequest, StartTransactionResponse,
};
use rust_ocpp::v1_6::messages::status_notification::{
    StatusNotificationRequest, StatusNotificationResponse,
};
use rust_ocpp::v1_6::messages::stop_transaction::{
    StopTransactionRequest, StopTransactionResponse,
};
use rust_ocpp::v1_6::types::{
    AuthorizationStatus, DataTransferStatus, IdTagInfo, RegistrationStatus,
};

use rust_ocpp::v2_0_1::datatypes::id_token_info_type::IdTokenInfoType;
use rust_ocpp::v2_0_1::enumerations::authorization_status_enum_type::AuthorizationStatusEnumType;
use rust_ocpp::v2_0_1::enumerations::registration_status_enum_type::RegistrationStatusEnumType;
use rust_ocpp::v2_0_1::messages::authorize as authorize_20;
use rust_ocpp::v2_0_1::messages::boot_notification as boot_20;
use rust_ocpp::v2_0_1::messages::datatransfer as data_transfer_20;
use rust_ocpp::v2_0_1::messages::firmware_status_notification as firmware_20;
use rust_ocpp::v2_0_1::messages::log_status_notification as log_20;
use rust_ocpp::v2_0_1::messages::meter_values as meter_20;
use rust_ocpp::v2_0_1::messages::notify_event as notify_event_20;
use rust_ocpp::v2_0_1::messages::notify_report as notify_report_20;
use rust_ocpp::v2_0_1::messages::security_event_notification as security_20;
use rust_ocpp::v2_0_1::messages::status_notification as status_20;
use rust_ocpp::v2_0_1::messages::transaction_event as transaction_20;

use crate::chargepoint::HandlerResult;
use crate::messages::v16_security::{
    Get15118EVCertificateRequest, Get15118EVCertificateResponse, GetCertificateStatusRequest,
    GetCertificateStatusResponse, GenericStatus, LogStatusNotificationRequest,
    LogStatusNotificationResponse, SecurityEventNotificationRequest,
    SecurityEventNotificationResponse, SignCertificateRequest, SignCertificateResponse,
    SignedFirmwareStatusNotificationRequest, SignedFirmwareStatusNotificationResponse,
};
use crate::rpc::RpcProblem;

use super::session::StationHandle;

fn accepted_id_tag_info() -> IdTagInfo {
    IdTagInfo {
        expiry_date: None,
        parent_id_tag: None,
        status: AuthorizationStatus::Accepted,
    }
}

fn accepted_id_token_info() -> IdTokenInfoType {
    IdTokenInfoType {
        status: AuthorizationStatusEnumType::Accepted,
        cache_expiry_date_time: None,
        charging_priority: None,
        language1: None,
        evse_id: None,
        language2: None,
        group_id_token: None,
        personal_message: None,
    }
}

/// Callbacks from the central-system stack into the backend.
#[async_trait]
pub trait CentralSystemEventsHandler: Send + Sync {
    // ── Admission ──────────────────────────────────────────

    /// Pre-handshake gate, invoked with the peer address before any bytes
    /// of the upgrade are processed.
    async fn accept_connection(&self, remote_ip: IpAddr) -> bool {
        let _ = remote_ip;
        true
    }

    /// Verify HTTP Basic credentials. OCPP 1.x fixes the username to the
    /// charge-point id, so only (id, password) reach the backend.
    async fn check_credentials(&self, charge_point_id: &str, password: &str) -> bool {
        let _ = (charge_point_id, password);
        true
    }

    /// A station connected and its typed proxy is ready for use.
    async fn station_connected(&self, station: StationHandle);

    /// The station's connection went away (or was replaced).
    async fn station_disconnected(&self, charge_point_id: &str) {
        let _ = charge_point_id;
    }

    // ── OCPP 1.6 station-initiated messages ────────────────

    async fn boot_notification(
        &self,
        charge_point_id: &str,
        request: BootNotificationRequest,
    ) -> HandlerResult<BootNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(BootNotificationResponse {
            current_time: Utc::now(),
            interval: 300,
            status: RegistrationStatus::Accepted,
        })
    }

    async fn authorize(
        &self,
        charge_point_id: &str,
        request: AuthorizeRequest,
    ) -> HandlerResult<AuthorizeResponse> {
        let _ = (charge_point_id, request);
        Ok(AuthorizeResponse {
            id_tag_info: accepted_id_tag_info(),
        })
    }

    async fn start_transaction(
        &self,
        charge_point_id: &str,
        request: StartTransactionRequest,
    ) -> HandlerResult<StartTransactionResponse> {
        let _ = (charge_point_id, request);
        Ok(StartTransactionResponse {
            id_tag_info: accepted_id_tag_info(),
            transaction_id: 0,
        })
    }

    async fn stop_transaction(
        &self,
        charge_point_id: &str,
        request: StopTransactionRequest,
    ) -> HandlerResult<StopTransactionResponse> {
        let _ = (charge_point_id, request);
        Ok(StopTransactionResponse {
            id_tag_info: Some(accepted_id_tag_info()),
        })
    }

    async fn status_notification(
        &self,
        charge_point_id: &str,
        request: StatusNotificationRequest,
    ) -> HandlerResult<StatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(StatusNotificationResponse {})
    }

    async fn meter_values(
        &self,
        charge_point_id: &str,
        request: MeterValuesRequest,
    ) -> HandlerResult<MeterValuesResponse> {
        let _ = (charge_point_id, request);
        Ok(MeterValuesResponse {})
    }

    async fn data_transfer(
        &self,
        charge_point_id: &str,
        request: DataTransferRequest,
    ) -> HandlerResult<DataTransferResponse> {
        let _ = (charge_point_id, request);
        Ok(DataTransferResponse {
            status: DataTransferStatus::UnknownVendorId,
            data: None,
        })
    }

    async fn diagnostics_status_notification(
        &self,
        charge_point_id: &str,
        request: DiagnosticsStatusNotificationRequest,
    ) -> HandlerResult<DiagnosticsStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(DiagnosticsStatusNotificationResponse {})
    }

    async fn firmware_status_notification(
        &self,
        charge_point_id: &str,
        request: FirmwareStatusNotificationRequest,
    ) -> HandlerResult<FirmwareStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(FirmwareStatusNotificationResponse {})
    }

    // ── OCPP 1.6 security extensions ───────────────────────

    async fn security_event_notification(
        &self,
        charge_point_id: &str,
        request: SecurityEventNotificationRequest,
    ) -> HandlerResult<SecurityEventNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(SecurityEventNotificationResponse {})
    }

    async fn sign_certificate(
        &self,
        charge_point_id: &str,
        request: SignCertificateRequest,
    ) -> HandlerResult<SignCertificateResponse> {
        let _ = (charge_point_id, request);
        Ok(SignCertificateResponse {
            status: GenericStatus::Rejected,
        })
    }

    async fn log_status_notification(
        &self,
        charge_point_id: &str,
        request: LogStatusNotificationRequest,
    ) -> HandlerResult<LogStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(LogStatusNotificationResponse {})
    }

    async fn signed_firmware_status_notification(
        &self,
        charge_point_id: &str,
        request: SignedFirmwareStatusNotificationRequest,
    ) -> HandlerResult<SignedFirmwareStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(SignedFirmwareStatusNotificationResponse {})
    }

    // ── OCPP 1.6 ISO 15118 ─────────────────────────────────

    async fn get_15118_ev_certificate(
        &self,
        charge_point_id: &str,
        request: Get15118EVCertificateRequest,
    ) -> HandlerResult<Get15118EVCertificateResponse> {
        let _ = (charge_point_id, request);
        Err(RpcProblem::not_supported("Get15118EVCertificate"))
    }

    async fn get_certificate_status(
        &self,
        charge_point_id: &str,
        request: GetCertificateStatusRequest,
    ) -> HandlerResult<GetCertificateStatusResponse> {
        let _ = (charge_point_id, request);
        Err(RpcProblem::not_supported("GetCertificateStatus"))
    }

    // ── OCPP 2.0.1 station-initiated messages ──────────────

    async fn boot_notification_20(
        &self,
        charge_point_id: &str,
        request: boot_20::BootNotificationRequest,
    ) -> HandlerResult<boot_20::BootNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(boot_20::BootNotificationResponse {
            current_time: Utc::now(),
            interval: 300,
            status: RegistrationStatusEnumType::Accepted,
            status_info: None,
        })
    }

    async fn authorize_20(
        &self,
        charge_point_id: &str,
        request: authorize_20::AuthorizeRequest,
    ) -> HandlerResult<authorize_20::AuthorizeResponse> {
        let _ = (charge_point_id, request);
        Ok(authorize_20::AuthorizeResponse {
            certificate_status: None,
            id_token_info: accepted_id_token_info(),
        })
    }

    async fn transaction_event(
        &self,
        charge_point_id: &str,
        request: transaction_20::TransactionEventRequest,
    ) -> HandlerResult<transaction_20::TransactionEventResponse> {
        let _ = (charge_point_id, request);
        Ok(transaction_20::TransactionEventResponse {
            total_cost: None,
            charging_priority: None,
            id_token_info: None,
            updated_personal_message: None,
        })
    }

    async fn status_notification_20(
        &self,
        charge_point_id: &str,
        request: status_20::StatusNotificationRequest,
    ) -> HandlerResult<status_20::StatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(status_20::StatusNotificationResponse {})
    }

    async fn meter_values_20(
        &self,
        charge_point_id: &str,
        request: meter_20::MeterValuesRequest,
    ) -> HandlerResult<meter_20::MeterValuesResponse> {
        let _ = (charge_point_id, request);
        Ok(meter_20::MeterValuesResponse {})
    }

    async fn data_transfer_20(
        &self,
        charge_point_id: &str,
        request: data_transfer_20::DataTransferRequest,
    ) -> HandlerResult<data_transfer_20::DataTransferResponse> {
        let _ = (charge_point_id, request);
        use rust_ocpp::v2_0_1::enumerations::data_transfer_status_enum_type::DataTransferStatusEnumType;
        Ok(data_transfer_20::DataTransferResponse {
            status: DataTransferStatusEnumType::UnknownVendorId,
            status_info: None,
            data: None,
        })
    }

    async fn security_event_notification_20(
        &self,
        charge_point_id: &str,
        request: security_20::SecurityEventNotificationRequest,
    ) -> HandlerResult<security_20::SecurityEventNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(security_20::SecurityEventNotificationResponse {})
    }

    async fn firmware_status_notification_20(
        &self,
        charge_point_id: &str,
        request: firmware_20::FirmwareStatusNotificationRequest,
    ) -> HandlerResult<firmware_20::FirmwareStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(firmware_20::FirmwareStatusNotificationResponse {})
    }

    async fn log_status_notification_20(
        &self,
        charge_point_id: &str,
        request: log_20::LogStatusNotificationRequest,
    ) -> HandlerResult<log_20::LogStatusNotificationResponse> {
        let _ = (charge_point_id, request);
        Ok(log_20::LogStatusNotificationResponse {})
    }

    async fn notify_event(
        &self,
        charge_point_id: &str,
        request: notify_event_20::NotifyEventRequest,
    ) -> HandlerResult<notify_event_20::NotifyEventResponse> {
        let _ = (charge_point_id, request);
        Ok(notify_event_20::NotifyEventResponse {})
    }

    async fn notify_report(
        &self,
        charge_point_id: &str,
        request: notify_report_20::NotifyReportRequest,
    ) -> HandlerResult<notify_report_20::NotifyReportResponse> {
        let _ = (charge_point_id, request);
        Ok(notify_report_20::NotifyReportResponse {})
    }
}
