//! MeterValues request

use rust_ocpp::v1_6::messages::meter_values::MeterValuesRequest;
use rust_ocpp::v1_6::types::MeterValue;
use tracing::debug;

use crate::chargepoint::ChargePoint;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Send meter samples for a connector. Queued while offline; on
    /// overflow the oldest queued sample batch of the same connector is
    /// dropped, so transactions are never starved by metering traffic.
    pub async fn meter_values(
        &self,
        connector_id: u32,
        transaction_id: Option<i32>,
        meter_value: Vec<MeterValue>,
    ) -> OcppResult<()> {
        debug!(
            connector_id,
            ?transaction_id,
            samples = meter_value.len(),
            "MeterValues"
        );

        let request = MeterValuesRequest {
            connector_id,
            transaction_id,
            meter_value,
        };
        let payload = serde_json::to_value(&request)?;

        self.send_or_queue(connector_id, V16Action::MeterValues, payload)
            .await?;
        Ok(())
    }
}
