//! v2.0.1 SetMonitoringBase command

use rust_ocpp::v2_0_1::messages::set_monitoring_base::{SetMonitoringBaseRequest, SetMonitoringBaseResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SetMonitoringBase to a v2.0.1 charging station.
    pub async fn set_monitoring_base(&self, request: SetMonitoringBaseRequest) -> OcppResult<SetMonitoringBaseResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 SetMonitoringBase");
        self.command(OcppVersion::V201, "SetMonitoringBase", &request).await
    }
}
