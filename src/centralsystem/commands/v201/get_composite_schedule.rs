//! v2.0.1 GetCompositeSchedule command

use rust_ocpp::v2_0_1::messages::get_composite_schedule::{GetCompositeScheduleRequest, GetCompositeScheduleResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetCompositeSchedule to a v2.0.1 charging station.
    pub async fn get_composite_schedule_20(&self, request: GetCompositeScheduleRequest) -> OcppResult<GetCompositeScheduleResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetCompositeSchedule");
        self.command(OcppVersion::V201, "GetCompositeSchedule", &request).await
    }
}
