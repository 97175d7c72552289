//! v2.0.1 ClearVariableMonitoring command

use rust_ocpp::v2_0_1::messages::clear_variable_monitoring::{ClearVariableMonitoringRequest, ClearVariableMonitoringResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ClearVariableMonitoring to a v2.0.1 charging station.
    pub async fn clear_variable_monitoring(&self, request: ClearVariableMonitoringRequest) -> OcppResult<ClearVariableMonitoringResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 ClearVariableMonitoring");
        self.command(OcppVersion::V201, "ClearVariableMonitoring", &request).await
    }
}
