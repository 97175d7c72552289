//! v2.0.1 GetTransactionStatus command

use rust_ocpp::v2_0_1::messages::get_transaction_status::{GetTransactionStatusRequest, GetTransactionStatusResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetTransactionStatus to a v2.0.1 charging station.
    pub async fn get_transaction_status(&self, request: GetTransactionStatusRequest) -> OcppResult<GetTransactionStatusResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetTransactionStatus");
        self.command(OcppVersion::V201, "GetTransactionStatus", &request).await
    }
}
