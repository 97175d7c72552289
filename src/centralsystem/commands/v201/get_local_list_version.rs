//! v2.0.1 GetLocalListVersion command

use rust_ocpp::v2_0_1::messages::get_local_list_version::{GetLocalListVersionRequest, GetLocalListVersionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetLocalListVersion to a v2.0.1 charging station.
    pub async fn get_local_list_version_20(&self, request: GetLocalListVersionRequest) -> OcppResult<GetLocalListVersionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetLocalListVersion");
        self.command(OcppVersion::V201, "GetLocalListVersion", &request).await
    }
}
