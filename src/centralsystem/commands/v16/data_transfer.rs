//! v1.6 DataTransfer command

use rust_ocpp::v1_6::messages::data_transfer::{DataTransferRequest, DataTransferResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send DataTransfer to a v1.6 charge point.
    pub async fn data_transfer(&self, request: DataTransferRequest) -> OcppResult<DataTransferResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 DataTransfer");
        self.command(OcppVersion::V16, "DataTransfer", &request).await
    }
}
