//! v2.0.1 SendLocalList command

use rust_ocpp::v2_0_1::messages::send_local_list::{SendLocalListRequest, SendLocalListResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SendLocalList to a v2.0.1 charging station.
    pub async fn send_local_list_20(&self, request: SendLocalListRequest) -> OcppResult<SendLocalListResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 SendLocalList");
        self.command(OcppVersion::V201, "SendLocalList", &request).await
    }
}
