//! v1.6 security-whitepaper commands

use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::messages::v16_security::{
    CertificateSignedRequest, CertificateSignedResponse, DeleteCertificateRequest,
    DeleteCertificateResponse, ExtendedTriggerMessageRequest, ExtendedTriggerMessageResponse,
    GetInstalledCertificateIdsRequest, GetInstalledCertificateIdsResponse, GetLogRequest,
    GetLogResponse, InstallCertificateRequest, InstallCertificateResponse,
    SignedUpdateFirmwareRequest, SignedUpdateFirmwareResponse,
};
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Deliver a freshly signed station certificate.
    pub async fn certificate_signed(
        &self,
        request: CertificateSignedRequest,
    ) -> OcppResult<CertificateSignedResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 CertificateSigned");
        self.command(OcppVersion::V16, "CertificateSigned", &request)
            .await
    }

    pub async fn delete_certificate(
        &self,
        request: DeleteCertificateRequest,
    ) -> OcppResult<DeleteCertificateResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 DeleteCertificate");
        self.command(OcppVersion::V16, "DeleteCertificate", &request)
            .await
    }

    pub async fn extended_trigger_message(
        &self,
        request: ExtendedTriggerMessageRequest,
    ) -> OcppResult<ExtendedTriggerMessageResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            requested = ?request.requested_message,
            "v1.6 ExtendedTriggerMessage"
        );
        self.command(OcppVersion::V16, "ExtendedTriggerMessage", &request)
            .await
    }

    pub async fn get_installed_certificate_ids(
        &self,
        request: GetInstalledCertificateIdsRequest,
    ) -> OcppResult<GetInstalledCertificateIdsResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            "v1.6 GetInstalledCertificateIds"
        );
        self.command(OcppVersion::V16, "GetInstalledCertificateIds", &request)
            .await
    }

    pub async fn get_log(&self, request: GetLogRequest) -> OcppResult<GetLogResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            request_id = request.request_id,
            "v1.6 GetLog"
        );
        self.command(OcppVersion::V16, "GetLog", &request).await
    }

    pub async fn install_certificate(
        &self,
        request: InstallCertificateRequest,
    ) -> OcppResult<InstallCertificateResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 InstallCertificate");
        self.command(OcppVersion::V16, "InstallCertificate", &request)
            .await
    }

    pub async fn signed_update_firmware(
        &self,
        request: SignedUpdateFirmwareRequest,
    ) -> OcppResult<SignedUpdateFirmwareResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            request_id = request.request_id,
            "v1.6 SignedUpdateFirmware"
        );
        self.command(OcppVersion::V16, "SignedUpdateFirmware", &request)
            .await
    }
}
