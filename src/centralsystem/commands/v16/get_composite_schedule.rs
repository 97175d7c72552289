//! v1.6 GetCompositeSchedule command

use rust_ocpp::v1_6::messages::get_composite_schedule::{GetCompositeScheduleRequest, GetCompositeScheduleResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetCompositeSchedule to a v1.6 charge point.
    pub async fn get_composite_schedule(&self, request: GetCompositeScheduleRequest) -> OcppResult<GetCompositeScheduleResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 GetCompositeSchedule");
        self.command(OcppVersion::V16, "GetCompositeSchedule", &request).await
    }
}
