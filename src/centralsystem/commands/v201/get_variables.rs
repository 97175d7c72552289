//! v2.0.1 GetVariables command

use rust_ocpp::v2_0_1::messages::get_variables::{GetVariablesRequest, GetVariablesResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetVariables to a v2.0.1 charging station.
    pub async fn get_variables(&self, request: GetVariablesRequest) -> OcppResult<GetVariablesResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetVariables");
        self.command(OcppVersion::V201, "GetVariables", &request).await
    }
}
