//! v1.6 RemoteStopTransaction command

use rust_ocpp::v1_6::messages::remote_stop_transaction::{RemoteStopTransactionRequest, RemoteStopTransactionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send RemoteStopTransaction to a v1.6 charge point.
    pub async fn remote_stop_transaction(&self, request: RemoteStopTransactionRequest) -> OcppResult<RemoteStopTransactionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 RemoteStopTransaction");
        self.command(OcppVersion::V16, "RemoteStopTransaction", &request).await
    }
}
