//! Charge-point events handler
//!
//! The embedding application implements this trait to receive lifecycle
//! notifications and to answer the remote commands the central system may
//! issue. Every command has a default implementation declining with
//! `NotSupported`, so embedders only implement what their hardware offers.

use async_trait::async_trait;

use rust_ocpp::v1_6::messages::cancel_reservation::{
    CancelReservationRequest, CancelReservationResponse,
};
use rust_ocpp::v1_6::messages::change_availability::{
    ChangeAvailabilityRequest, ChangeAvailabilityResponse,
};
use rust_ocpp::v1_6::messages::change_configuration::{
    ChangeConfigurationRequest, ChangeConfigurationResponse,
};
use rust_ocpp::v1_6::messages::clear_cache::{ClearCacheRequest, ClearCacheResponse};
use rust_ocpp::v1_6::messages::clear_charging_profile::{
    ClearChargingProfileRequest, ClearChargingProfileResponse,
};
use rust_ocpp::v1_6::messages::data_transfer::{DataTransferRequest, DataTransferResponse};
use rust_ocpp::v1_6::messages::get_composite_schedule::{
    GetCompositeScheduleRequest, GetCompositeScheduleResponse,
};
use rust_ocpp::v1_6::messages::get_configuration::{
    GetConfigurationRequest, GetConfigurationResponse,
};
use rust_ocpp::v1_6::messages::get_diagnostics::{GetDiagnosticsRequest, GetDiagnosticsResponse};
use rust_ocpp::v1_6::messages::remote_start_transaction::{
    RemoteStartTransactionRequest, RemoteStartTransactionResponse,
};
use rust_ocpp::v1_6::messages::remote_stop_transaction::{
    RemoteStopTransactionRequest, RemoteStopTransactionResponse,
};
use rust_ocpp::v1_6::messages::reserve_now::{ReserveNowRequest, ReserveNowResponse};
use rust_ocpp::v1_6::messages::reset::{ResetRequest, ResetResponse};
use rust_ocpp::v1_6::messages::send_local_list::{SendLocalListRequest, SendLocalListResponse};
use rust_ocpp::v1_6::messages::set_charging_profile::{
    SetChargingProfileRequest, SetChargingProfileResponse,
};
use rust_ocpp::v1_6::messages::unlock_connector::{
    UnlockConnectorRequest, UnlockConnectorResponse,
};
use rust_ocpp::v1_6::messages::update_firmware::{UpdateFirmwareRequest, UpdateFirmwareResponse};

use crate::messages::v16_security::{
    CertificateSignedRequest, CertificateSignedResponse, DeleteCertificateRequest,
    DeleteCertificateResponse, GetInstalledCertificateIdsRequest,
    GetInstalledCertificateIdsResponse, GetLogRequest, GetLogResponse, InstallCertificateRequest,
    InstallCertificateResponse, Iso15118GetInstalledCertificateIdsRequest,
    Iso15118GetInstalledCertificateIdsResponse, Iso15118InstallCertificateRequest,
    SignedUpdateFirmwareRequest, SignedUpdateFirmwareResponse,
};
use crate::rpc::RpcProblem;

use super::session::RegistrationStatus;

/// Outcome of one remote-command handler.
pub type HandlerResult<T> = Result<T, RpcProblem>;

fn unsupported<T>(action: &str) -> HandlerResult<T> {
    Err(RpcProblem::not_supported(action))
}

/// Callbacks from the charge-point stack into the embedding application.
#[async_trait]
pub trait ChargePointEventsHandler: Send + Sync {
    // ── Lifecycle ──────────────────────────────────────────

    /// Transport connectivity changed.
    async fn connection_state_changed(&self, connected: bool) {
        let _ = connected;
    }

    /// The central system's view of this station changed (BootNotification
    /// response, or reset to the persisted value on startup).
    async fn registration_status_changed(&self, status: RegistrationStatus) {
        let _ = status;
    }

    // ── Core profile remote commands ───────────────────────

    async fn cancel_reservation(
        &self,
        request: CancelReservationRequest,
    ) -> HandlerResult<CancelReservationResponse> {
        let _ = request;
        unsupported("CancelReservation")
    }

    async fn change_availability(
        &self,
        request: ChangeAvailabilityRequest,
    ) -> HandlerResult<ChangeAvailabilityResponse> {
        let _ = request;
        unsupported("ChangeAvailability")
    }

    async fn change_configuration(
        &self,
        request: ChangeConfigurationRequest,
    ) -> HandlerResult<ChangeConfigurationResponse> {
        let _ = request;
        unsupported("ChangeConfiguration")
    }

    async fn clear_cache(&self, request: ClearCacheRequest) -> HandlerResult<ClearCacheResponse> {
        let _ = request;
        unsupported("ClearCache")
    }

    async fn clear_charging_profile(
        &self,
        request: ClearChargingProfileRequest,
    ) -> HandlerResult<ClearChargingProfileResponse> {
        let _ = request;
        unsupported("ClearChargingProfile")
    }

    async fn data_transfer(
        &self,
        request: DataTransferRequest,
    ) -> HandlerResult<DataTransferResponse> {
        let _ = request;
        unsupported("DataTransfer")
    }

    async fn get_composite_schedule(
        &self,
        request: GetCompositeScheduleRequest,
    ) -> HandlerResult<GetCompositeScheduleResponse> {
        let _ = request;
        unsupported("GetCompositeSchedule")
    }

    async fn get_configuration(
        &self,
        request: GetConfigurationRequest,
    ) -> HandlerResult<GetConfigurationResponse> {
        let _ = request;
        unsupported("GetConfiguration")
    }

    async fn get_diagnostics(
        &self,
        request: GetDiagnosticsRequest,
    ) -> HandlerResult<GetDiagnosticsResponse> {
        let _ = request;
        unsupported("GetDiagnostics")
    }

    async fn remote_start_transaction(
        &self,
        request: RemoteStartTransactionRequest,
    ) -> HandlerResult<RemoteStartTransactionResponse> {
        let _ = request;
        unsupported("RemoteStartTransaction")
    }

    async fn remote_stop_transaction(
        &self,
        request: RemoteStopTransactionRequest,
    ) -> HandlerResult<RemoteStopTransactionResponse> {
        let _ = request;
        unsupported("RemoteStopTransaction")
    }

    async fn reserve_now(&self, request: ReserveNowRequest) -> HandlerResult<ReserveNowResponse> {
        let _ = request;
        unsupported("ReserveNow")
    }

    async fn reset(&self, request: ResetRequest) -> HandlerResult<ResetResponse> {
        let _ = request;
        unsupported("Reset")
    }

    /// Accepting a SendLocalList with a new version also updates the
    /// persisted local-list version served by GetLocalListVersion.
    async fn send_local_list(
        &self,
        request: SendLocalListRequest,
    ) -> HandlerResult<SendLocalListResponse> {
        let _ = request;
        unsupported("SendLocalList")
    }

    async fn set_charging_profile(
        &self,
        request: SetChargingProfileRequest,
    ) -> HandlerResult<SetChargingProfileResponse> {
        let _ = request;
        unsupported("SetChargingProfile")
    }

    async fn unlock_connector(
        &self,
        request: UnlockConnectorRequest,
    ) -> HandlerResult<UnlockConnectorResponse> {
        let _ = request;
        unsupported("UnlockConnector")
    }

    async fn update_firmware(
        &self,
        request: UpdateFirmwareRequest,
    ) -> HandlerResult<UpdateFirmwareResponse> {
        let _ = request;
        unsupported("UpdateFirmware")
    }

    // ── Security extensions ────────────────────────────────

    async fn certificate_signed(
        &self,
        request: CertificateSignedRequest,
    ) -> HandlerResult<CertificateSignedResponse> {
        let _ = request;
        unsupported("CertificateSigned")
    }

    async fn delete_certificate(
        &self,
        request: DeleteCertificateRequest,
    ) -> HandlerResult<DeleteCertificateResponse> {
        let _ = request;
        unsupported("DeleteCertificate")
    }

    async fn get_installed_certificate_ids(
        &self,
        request: GetInstalledCertificateIdsRequest,
    ) -> HandlerResult<GetInstalledCertificateIdsResponse> {
        let _ = request;
        unsupported("GetInstalledCertificateIds")
    }

    async fn get_log(&self, request: GetLogRequest) -> HandlerResult<GetLogResponse> {
        let _ = request;
        unsupported("GetLog")
    }

    async fn install_certificate(
        &self,
        request: InstallCertificateRequest,
    ) -> HandlerResult<InstallCertificateResponse> {
        let _ = request;
        unsupported("InstallCertificate")
    }

    /// Accepted requests also persist the request id so firmware status can
    /// be reported after a reboot mid-update.
    async fn signed_update_firmware(
        &self,
        request: SignedUpdateFirmwareRequest,
    ) -> HandlerResult<SignedUpdateFirmwareResponse> {
        let _ = request;
        unsupported("SignedUpdateFirmware")
    }

    // ── ISO 15118 certificate management ───────────────────

    async fn iso15118_get_installed_certificate_ids(
        &self,
        request: Iso15118GetInstalledCertificateIdsRequest,
    ) -> HandlerResult<Iso15118GetInstalledCertificateIdsResponse> {
        let _ = request;
        unsupported("Iso15118GetInstalledCertificateIds")
    }

    async fn iso15118_install_certificate(
        &self,
        request: Iso15118InstallCertificateRequest,
    ) -> HandlerResult<InstallCertificateResponse> {
        let _ = request;
        unsupported("Iso15118InstallCertificate")
    }

    /// Asked to send a SignCertificate for the ISO 15118 leaf certificate.
    /// Return `true` to accept the trigger.
    async fn iso15118_trigger_sign_certificate(&self) -> bool {
        false
    }
}
