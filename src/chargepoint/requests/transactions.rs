//! StartTransaction / StopTransaction requests

use chrono::Utc;
use rust_ocpp::v1_6::messages::start_transaction::{
    StartTransactionRequest, StartTransactionResponse,
};
use rust_ocpp::v1_6::messages::stop_transaction::{
    StopTransactionRequest, StopTransactionResponse,
};
use rust_ocpp::v1_6::types::{MeterValue, Reason};
use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Report the start of a charging transaction.
    ///
    /// `Ok(Some(response))` carries the transaction id from the central
    /// system; `Ok(None)` means the request was queued while offline and
    /// the response will only exist after replay.
    pub async fn start_transaction(
        &self,
        connector_id: u32,
        id_tag: &str,
        meter_start: i32,
        reservation_id: Option<i32>,
    ) -> OcppResult<Option<StartTransactionResponse>> {
        info!(connector_id, id_tag, meter_start, "StartTransaction");

        let request = StartTransactionRequest {
            connector_id,
            id_tag: id_tag.to_string(),
            meter_start,
            reservation_id,
            timestamp: Utc::now(),
        };
        let payload = serde_json::to_value(&request)?;

        match self
            .send_or_queue(connector_id, V16Action::StartTransaction, payload)
            .await?
        {
            Some(result) => Ok(Some(serde_json::from_value(result)?)),
            None => Ok(None),
        }
    }

    /// Report the end of a charging transaction.
    pub async fn stop_transaction(
        &self,
        transaction_id: i32,
        meter_stop: i32,
        id_tag: Option<&str>,
        reason: Option<Reason>,
        transaction_data: Option<Vec<MeterValue>>,
    ) -> OcppResult<Option<StopTransactionResponse>> {
        info!(transaction_id, meter_stop, ?reason, "StopTransaction");

        let request = StopTransactionRequest {
            id_tag: id_tag.map(|t| t.to_string()),
            meter_stop,
            timestamp: Utc::now(),
            transaction_id,
            reason,
            transaction_data,
        };
        let payload = serde_json::to_value(&request)?;

        // StopTransaction is not bound to a connector; queue under 0
        match self
            .send_or_queue(0, V16Action::StopTransaction, payload)
            .await?
        {
            Some(result) => Ok(Some(serde_json::from_value(result)?)),
            None => Ok(None),
        }
    }
}
