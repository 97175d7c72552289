//! DataTransfer request

use rust_ocpp::v1_6::messages::data_transfer::{DataTransferRequest, DataTransferResponse};
use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Vendor-specific data exchange with the central system. Needs a live
    /// session; the answer is meaningless hours later.
    pub async fn data_transfer(
        &self,
        vendor_string: &str,
        message_id: Option<&str>,
        data: Option<String>,
    ) -> OcppResult<DataTransferResponse> {
        info!(vendor_string, ?message_id, "DataTransfer");

        let request = DataTransferRequest {
            vendor_string: vendor_string.to_string(),
            message_id: message_id.map(|m| m.to_string()),
            data,
        };
        let payload = serde_json::to_value(&request)?;

        let result = self.call_live(V16Action::DataTransfer, payload).await?;
        Ok(serde_json::from_value(result)?)
    }
}
