//! v2.0.1 GetBaseReport command

use rust_ocpp::v2_0_1::messages::get_base_report::{GetBaseReportRequest, GetBaseReportResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetBaseReport to a v2.0.1 charging station.
    pub async fn get_base_report(&self, request: GetBaseReportRequest) -> OcppResult<GetBaseReportResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetBaseReport");
        self.command(OcppVersion::V201, "GetBaseReport", &request).await
    }
}
