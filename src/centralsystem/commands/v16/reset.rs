//! v1.6 Reset command

use rust_ocpp::v1_6::messages::reset::{ResetRequest, ResetResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send Reset to a v1.6 charge point.
    pub async fn reset(&self, request: ResetRequest) -> OcppResult<ResetResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 Reset");
        self.command(OcppVersion::V16, "Reset", &request).await
    }
}
