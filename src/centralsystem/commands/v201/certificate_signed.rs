//! v2.0.1 CertificateSigned command

use rust_ocpp::v2_0_1::messages::certificate_signed::{CertificateSignedRequest, CertificateSignedResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send CertificateSigned to a v2.0.1 charging station.
    pub async fn certificate_signed_20(&self, request: CertificateSignedRequest) -> OcppResult<CertificateSignedResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 CertificateSigned");
        self.command(OcppVersion::V201, "CertificateSigned", &request).await
    }
}
