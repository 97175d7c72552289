//! v2.0.1 Reset command

use rust_ocpp::v2_0_1::messages::reset::{ResetRequest, ResetResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send Reset to a v2.0.1 charging station.
    pub async fn reset_20(&self, request: ResetRequest) -> OcppResult<ResetResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 Reset");
        self.command(OcppVersion::V201, "Reset", &request).await
    }
}
