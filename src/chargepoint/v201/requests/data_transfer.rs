//! DataTransfer request

use rust_ocpp::v2_0_1::messages::datatransfer::{DataTransferRequest, DataTransferResponse};
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Vendor-specific data exchange with the CSMS. Needs a live session;
    /// the answer is meaningless hours later.
    pub async fn data_transfer(
        &self,
        request: DataTransferRequest,
    ) -> OcppResult<DataTransferResponse> {
        info!(vendor_id = request.vendor_id.as_str(), "DataTransfer");

        let payload = serde_json::to_value(&request)?;
        let result = self.call_live(V201Action::DataTransfer, payload).await?;
        Ok(serde_json::from_value(result)?)
    }
}
