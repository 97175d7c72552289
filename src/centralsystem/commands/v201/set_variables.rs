//! v2.0.1 SetVariables command

use rust_ocpp::v2_0_1::messages::set_variables::{SetVariablesRequest, SetVariablesResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SetVariables to a v2.0.1 charging station.
    pub async fn set_variables(&self, request: SetVariablesRequest) -> OcppResult<SetVariablesResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 SetVariables");
        self.command(OcppVersion::V201, "SetVariables", &request).await
    }
}
