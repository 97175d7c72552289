//! v1.6 SendLocalList command

use rust_ocpp::v1_6::messages::send_local_list::{SendLocalListRequest, SendLocalListResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SendLocalList to a v1.6 charge point.
    pub async fn send_local_list(&self, request: SendLocalListRequest) -> OcppResult<SendLocalListResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 SendLocalList");
        self.command(OcppVersion::V16, "SendLocalList", &request).await
    }
}
