//! v1.6 ReserveNow command

use rust_ocpp::v1_6::messages::reserve_now::{ReserveNowRequest, ReserveNowResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ReserveNow to a v1.6 charge point.
    pub async fn reserve_now(&self, request: ReserveNowRequest) -> OcppResult<ReserveNowResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 ReserveNow");
        self.command(OcppVersion::V16, "ReserveNow", &request).await
    }
}
