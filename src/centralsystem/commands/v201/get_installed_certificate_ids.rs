//! v2.0.1 GetInstalledCertificateIds command

use rust_ocpp::v2_0_1::messages::get_installed_certificate_ids::{GetInstalledCertificateIdsRequest, GetInstalledCertificateIdsResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetInstalledCertificateIds to a v2.0.1 charging station.
    pub async fn get_installed_certificate_ids_20(&self, request: GetInstalledCertificateIdsRequest) -> OcppResult<GetInstalledCertificateIdsResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetInstalledCertificateIds");
        self.command(OcppVersion::V201, "GetInstalledCertificateIds", &request).await
    }
}
