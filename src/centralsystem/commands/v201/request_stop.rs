//! v2.0.1 RequestStopTransaction command

use rust_ocpp::v2_0_1::messages::request_stop_transaction::{RequestStopTransactionRequest, RequestStopTransactionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send RequestStopTransaction to a v2.0.1 charging station.
    pub async fn request_stop_transaction(&self, request: RequestStopTransactionRequest) -> OcppResult<RequestStopTransactionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 RequestStopTransaction");
        self.command(OcppVersion::V201, "RequestStopTransaction", &request).await
    }
}
