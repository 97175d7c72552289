//! v2.0.1 RequestStartTransaction command

use rust_ocpp::v2_0_1::messages::request_start_transaction::{RequestStartTransactionRequest, RequestStartTransactionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send RequestStartTransaction to a v2.0.1 charging station.
    pub async fn request_start_transaction(&self, request: RequestStartTransactionRequest) -> OcppResult<RequestStartTransactionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 RequestStartTransaction");
        self.command(OcppVersion::V201, "RequestStartTransaction", &request).await
    }
}
