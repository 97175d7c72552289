//! v1.6 GetDiagnostics command

use rust_ocpp::v1_6::messages::get_diagnostics::{GetDiagnosticsRequest, GetDiagnosticsResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetDiagnostics to a v1.6 charge point.
    pub async fn get_diagnostics(&self, request: GetDiagnosticsRequest) -> OcppResult<GetDiagnosticsResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 GetDiagnostics");
        self.command(OcppVersion::V16, "GetDiagnostics", &request).await
    }
}
