//! v1.6 ISO 15118 certificate-management commands

use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::messages::v16_security::{
    InstallCertificateResponse, Iso15118GetInstalledCertificateIdsRequest,
    Iso15118GetInstalledCertificateIdsResponse, Iso15118InstallCertificateRequest,
    Iso15118TriggerMessageRequest, Iso15118TriggerMessageResponse,
};
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    pub async fn iso15118_get_installed_certificate_ids(
        &self,
        request: Iso15118GetInstalledCertificateIdsRequest,
    ) -> OcppResult<Iso15118GetInstalledCertificateIdsResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            "v1.6 Iso15118GetInstalledCertificateIds"
        );
        self.command(OcppVersion::V16, "Iso15118GetInstalledCertificateIds", &request)
            .await
    }

    pub async fn iso15118_install_certificate(
        &self,
        request: Iso15118InstallCertificateRequest,
    ) -> OcppResult<InstallCertificateResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            "v1.6 Iso15118InstallCertificate"
        );
        self.command(OcppVersion::V16, "Iso15118InstallCertificate", &request)
            .await
    }

    /// Ask the station to send a SignCertificate for its ISO 15118 leaf
    /// certificate.
    pub async fn iso15118_trigger_message(&self) -> OcppResult<Iso15118TriggerMessageResponse> {
        info!(
            charge_point_id = self.charge_point_id(),
            "v1.6 Iso15118TriggerMessage"
        );
        self.command(
            OcppVersion::V16,
            "Iso15118TriggerMessage",
            &Iso15118TriggerMessageRequest {},
        )
        .await
    }
}
