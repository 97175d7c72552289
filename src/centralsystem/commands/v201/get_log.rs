//! v2.0.1 GetLog command

use rust_ocpp::v2_0_1::messages::get_log::{GetLogRequest, GetLogResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetLog to a v2.0.1 charging station.
    pub async fn get_log_20(&self, request: GetLogRequest) -> OcppResult<GetLogResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetLog");
        self.command(OcppVersion::V201, "GetLog", &request).await
    }
}
