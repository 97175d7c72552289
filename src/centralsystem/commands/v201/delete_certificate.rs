//! v2.0.1 DeleteCertificate command

use rust_ocpp::v2_0_1::messages::delete_certificate::{DeleteCertificateRequest, DeleteCertificateResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send DeleteCertificate to a v2.0.1 charging station.
    pub async fn delete_certificate_20(&self, request: DeleteCertificateRequest) -> OcppResult<DeleteCertificateResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 DeleteCertificate");
        self.command(OcppVersion::V201, "DeleteCertificate", &request).await
    }
}
