//! v2.0.1 InstallCertificate command

use rust_ocpp::v2_0_1::messages::install_certificate::{InstallCertificateRequest, InstallCertificateResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send InstallCertificate to a v2.0.1 charging station.
    pub async fn install_certificate_20(&self, request: InstallCertificateRequest) -> OcppResult<InstallCertificateResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 InstallCertificate");
        self.command(OcppVersion::V201, "InstallCertificate", &request).await
    }
}
