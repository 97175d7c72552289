//! v1.6 GetLocalListVersion command

use rust_ocpp::v1_6::messages::get_local_list_version::{GetLocalListVersionRequest, GetLocalListVersionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetLocalListVersion to a v1.6 charge point.
    pub async fn get_local_list_version(&self, request: GetLocalListVersionRequest) -> OcppResult<GetLocalListVersionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 GetLocalListVersion");
        self.command(OcppVersion::V16, "GetLocalListVersion", &request).await
    }
}
