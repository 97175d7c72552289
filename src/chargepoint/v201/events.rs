//! Charging-station (OCPP 2.0.1) events handler
//!
//! Counterpart of [`ChargePointEventsHandler`](super::super::events::ChargePointEventsHandler)
//! for 2.0.1 stations. Every CSMS-initiated command defaults to
//! `NotSupported`; embedders implement what their hardware offers.

use async_trait::async_trait;

use rust_ocpp::v2_0_1::messages::cancel_reservation::{
    CancelReservationRequest, CancelReservationResponse,
};
use rust_ocpp::v2_0_1::messages::certificate_signed::{
    CertificateSignedRequest, CertificateSignedResponse,
};
use rust_ocpp::v2_0_1::messages::change_availability::{
    ChangeAvailabilityRequest, ChangeAvailabilityResponse,
};
use rust_ocpp::v2_0_1::messages::clear_cache::{ClearCacheRequest, ClearCacheResponse};
use rust_ocpp::v2_0_1::messages::clear_charging_profile::{
    ClearChargingProfileRequest, ClearChargingProfileResponse,
};
use rust_ocpp::v2_0_1::messages::clear_variable_monitoring::{
    ClearVariableMonitoringRequest, ClearVariableMonitoringResponse,
};
use rust_ocpp::v2_0_1::messages::datatransfer::{DataTransferRequest, DataTransferResponse};
use rust_ocpp::v2_0_1::messages::delete_certificate::{
    DeleteCertificateRequest, DeleteCertificateResponse,
};
use rust_ocpp::v2_0_1::messages::get_base_report::{GetBaseReportRequest, GetBaseReportResponse};
use rust_ocpp::v2_0_1::messages::get_charging_profiles::{
    GetChargingProfilesRequest, GetChargingProfilesResponse,
};
use rust_ocpp::v2_0_1::messages::get_composite_schedule::{
    GetCompositeScheduleRequest, GetCompositeScheduleResponse,
};
use rust_ocpp::v2_0_1::messages::get_installed_certificate_ids::{
    GetInstalledCertificateIdsRequest, GetInstalledCertificateIdsResponse,
};
use rust_ocpp::v2_0_1::messages::get_log::{GetLogRequest, GetLogResponse};
use rust_ocpp::v2_0_1::messages::get_transaction_status::{
    GetTransactionStatusRequest, GetTransactionStatusResponse,
};
use rust_ocpp::v2_0_1::messages::get_variables::{GetVariablesRequest, GetVariablesResponse};
use rust_ocpp::v2_0_1::messages::install_certificate::{
    InstallCertificateRequest, InstallCertificateResponse,
};
use rust_ocpp::v2_0_1::messages::request_start_transaction::{
    RequestStartTransactionRequest, RequestStartTransactionResponse,
};
use rust_ocpp::v2_0_1::messages::request_stop_transaction::{
    RequestStopTransactionRequest, RequestStopTransactionResponse,
};
use rust_ocpp::v2_0_1::messages::reserve_now::{ReserveNowRequest, ReserveNowResponse};
use rust_ocpp::v2_0_1::messages::reset::{ResetRequest, ResetResponse};
use rust_ocpp::v2_0_1::messages::send_local_list::{SendLocalListRequest, SendLocalListResponse};
use rust_ocpp::v2_0_1::messages::set_charging_profile::{
    SetChargingProfileRequest, SetChargingProfileResponse,
};
use rust_ocpp::v2_0_1::messages::set_monitoring_base::{
    SetMonitoringBaseRequest, SetMonitoringBaseResponse,
};
use rust_ocpp::v2_0_1::messages::set_variable_monitoring::{
    SetVariableMonitoringRequest, SetVariableMonitoringResponse,
};
use rust_ocpp::v2_0_1::messages::set_variables::{SetVariablesRequest, SetVariablesResponse};
use rust_ocpp::v2_0_1::messages::unlock_connector::{
    UnlockConnectorRequest, UnlockConnectorResponse,
};
use rust_ocpp::v2_0_1::messages::update_firmware::{UpdateFirmwareRequest, UpdateFirmwareResponse};

use crate::chargepoint::events::HandlerResult;
use crate::chargepoint::session::RegistrationStatus;
use crate::rpc::RpcProblem;

fn unsupported<T>(action: &str) -> HandlerResult<T> {
    Err(RpcProblem::not_supported(action))
}

/// Callbacks from the charging-station stack into the embedding
/// application.
#[async_trait]
pub trait ChargingStationEventsHandler: Send + Sync {
    // ── Lifecycle ──────────────────────────────────────────

    async fn connection_state_changed(&self, connected: bool) {
        let _ = connected;
    }

    async fn registration_status_changed(&self, status: RegistrationStatus) {
        let _ = status;
    }

    // ── CSMS-initiated commands ────────────────────────────

    async fn cancel_reservation(
        &self,
        request: CancelReservationRequest,
    ) -> HandlerResult<CancelReservationResponse> {
        let _ = request;
        unsupported("CancelReservation")
    }

    async fn certificate_signed(
        &self,
        request: CertificateSignedRequest,
    ) -> HandlerResult<CertificateSignedResponse> {
        let _ = request;
        unsupported("CertificateSigned")
    }

    async fn change_availability(
        &self,
        request: ChangeAvailabilityRequest,
    ) -> HandlerResult<ChangeAvailabilityResponse> {
        let _ = request;
        unsupported("ChangeAvailability")
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

    async fn clear_variable_monitoring(
        &self,
        request: ClearVariableMonitoringRequest,
    ) -> HandlerResult<ClearVariableMonitoringResponse> {
        let _ = request;
        unsupported("ClearVariableMonitoring")
    }

    async fn data_transfer(
        &self,
        request: DataTransferRequest,
    ) -> HandlerResult<DataTransferResponse> {
        let _ = request;
        unsupported("DataTransfer")
    }

    async fn delete_certificate(
        &self,
        request: DeleteCertificateRequest,
    ) -> HandlerResult<DeleteCertificateResponse> {
        let _ = request;
        unsupported("DeleteCertificate")
    }

    async fn get_base_report(
        &self,
        request: GetBaseReportRequest,
    ) -> HandlerResult<GetBaseReportResponse> {
        let _ = request;
        unsupported("GetBaseReport")
    }

    async fn get_charging_profiles(
        &self,
        request: GetChargingProfilesRequest,
    ) -> HandlerResult<GetChargingProfilesResponse> {
        let _ = request;
        unsupported("GetChargingProfiles")
    }

    async fn get_composite_schedule(
        &self,
        request: GetCompositeScheduleRequest,
    ) -> HandlerResult<GetCompositeScheduleResponse> {
        let _ = request;
        unsupported("GetCompositeSchedule")
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

    async fn get_transaction_status(
        &self,
        request: GetTransactionStatusRequest,
    ) -> HandlerResult<GetTransactionStatusResponse> {
        let _ = request;
        unsupported("GetTransactionStatus")
    }

    async fn get_variables(
        &self,
        request: GetVariablesRequest,
    ) -> HandlerResult<GetVariablesResponse> {
        let _ = request;
        unsupported("GetVariables")
    }

    async fn install_certificate(
        &self,
        request: InstallCertificateRequest,
    ) -> HandlerResult<InstallCertificateResponse> {
        let _ = request;
        unsupported("InstallCertificate")
    }

    async fn request_start_transaction(
        &self,
        request: RequestStartTransactionRequest,
    ) -> HandlerResult<RequestStartTransactionResponse> {
        let _ = request;
        unsupported("RequestStartTransaction")
    }

    async fn request_stop_transaction(
        &self,
        request: RequestStopTransactionRequest,
    ) -> HandlerResult<RequestStopTransactionResponse> {
        let _ = request;
        unsupported("RequestStopTransaction")
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

    async fn set_monitoring_base(
        &self,
        request: SetMonitoringBaseRequest,
    ) -> HandlerResult<SetMonitoringBaseResponse> {
        let _ = request;
        unsupported("SetMonitoringBase")
    }

    async fn set_variable_monitoring(
        &self,
        request: SetVariableMonitoringRequest,
    ) -> HandlerResult<SetVariableMonitoringResponse> {
        let _ = request;
        unsupported("SetVariableMonitoring")
    }

    async fn set_variables(
        &self,
        request: SetVariablesRequest,
    ) -> HandlerResult<SetVariablesResponse> {
        let _ = request;
        unsupported("SetVariables")
    }

    async fn unlock_connector(
        &self,
        request: UnlockConnectorRequest,
    ) -> HandlerResult<UnlockConnectorResponse> {
        let _ = request;
        unsupported("UnlockConnector")
    }

    /// Accepted requests also persist the request id so firmware status can
    /// be reported after the installation reboot.
    async fn update_firmware(
        &self,
        request: UpdateFirmwareRequest,
    ) -> HandlerResult<UpdateFirmwareResponse> {
        let _ = request;
        unsupported("UpdateFirmware")
    }
}
