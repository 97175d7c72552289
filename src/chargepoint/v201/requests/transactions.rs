//! TransactionEvent request

use rust_ocpp::v2_0_1::messages::transaction_event::{
    TransactionEventRequest, TransactionEventResponse,
};
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Report a transaction lifecycle event (Started/Updated/Ended).
    ///
    /// `Ok(Some(response))` for a live round-trip; `Ok(None)` means the
    /// event was queued while offline and will be replayed in order. On
    /// queue overflow the event is rejected, never dropped.
    pub async fn transaction_event(
        &self,
        request: TransactionEventRequest,
    ) -> OcppResult<Option<TransactionEventResponse>> {
        info!(event_type = ?request.event_type, "TransactionEvent");

        let connector_id = request.evse.as_ref().map(|e| e.id as u32).unwrap_or(0);
        let payload = serde_json::to_value(&request)?;

        match self
            .send_or_queue(connector_id, V201Action::TransactionEvent, payload)
            .await?
        {
            Some(result) => Ok(Some(serde_json::from_value(result)?)),
            None => Ok(None),
        }
    }
}
