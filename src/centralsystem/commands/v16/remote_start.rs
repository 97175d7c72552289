//! v1.6 RemoteStartTransaction command

use rust_ocpp::v1_6::messages::remote_start_transaction::{RemoteStartTransactionRequest, RemoteStartTransactionResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send RemoteStartTransaction to a v1.6 charge point.
    pub async fn remote_start_transaction(&self, request: RemoteStartTransactionRequest) -> OcppResult<RemoteStartTransactionResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 RemoteStartTransaction");
        self.command(OcppVersion::V16, "RemoteStartTransaction", &request).await
    }
}
