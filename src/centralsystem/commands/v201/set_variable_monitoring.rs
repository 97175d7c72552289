//! v2.0.1 SetVariableMonitoring command

use rust_ocpp::v2_0_1::messages::set_variable_monitoring::{SetVariableMonitoringRequest, SetVariableMonitoringResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SetVariableMonitoring to a v2.0.1 charging station.
    pub async fn set_variable_monitoring(&self, request: SetVariableMonitoringRequest) -> OcppResult<SetVariableMonitoringResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 SetVariableMonitoring");
        self.command(OcppVersion::V201, "SetVariableMonitoring", &request).await
    }
}
