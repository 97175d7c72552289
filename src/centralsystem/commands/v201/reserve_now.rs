//! v2.0.1 ReserveNow command

use rust_ocpp::v2_0_1::messages::reserve_now::{ReserveNowRequest, ReserveNowResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ReserveNow to a v2.0.1 charging station.
    pub async fn reserve_now_20(&self, request: ReserveNowRequest) -> OcppResult<ReserveNowResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 ReserveNow");
        self.command(OcppVersion::V201, "ReserveNow", &request).await
    }
}
