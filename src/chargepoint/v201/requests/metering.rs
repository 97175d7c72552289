//! MeterValues request

use rust_ocpp::v2_0_1::datatypes::meter_value_type::MeterValueType;
use rust_ocpp::v2_0_1::messages::meter_values::MeterValuesRequest;
use tracing::debug;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Send meter samples for an EVSE. Queued while offline; on overflow
    /// the oldest queued sample batch of the same EVSE is dropped.
    pub async fn meter_values(
        &self,
        evse_id: u32,
        meter_value: Vec<MeterValueType>,
    ) -> OcppResult<()> {
        debug!(evse_id, samples = meter_value.len(), "MeterValues");

        let request = MeterValuesRequest {
            evse_id: evse_id as i32,
            meter_value,
        };
        let payload = serde_json::to_value(&request)?;

        self.send_or_queue(evse_id, V201Action::MeterValues, payload)
            .await?;
        Ok(())
    }
}
