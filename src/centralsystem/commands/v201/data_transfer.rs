//! v2.0.1 DataTransfer command

use rust_ocpp::v2_0_1::messages::datatransfer::{DataTransferRequest, DataTransferResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send DataTransfer to a v2.0.1 charging station.
    pub async fn data_transfer_20(&self, request: DataTransferRequest) -> OcppResult<DataTransferResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 DataTransfer");
        self.command(OcppVersion::V201, "DataTransfer", &request).await
    }
}
