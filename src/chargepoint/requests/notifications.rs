//! Status / progress notifications

use chrono::Utc;
use rust_ocpp::v1_6::messages::diagnostics_status_notification::DiagnosticsStatusNotificationRequest;
use rust_ocpp::v1_6::messages::firmware_status_notification::FirmwareStatusNotificationRequest;
use rust_ocpp::v1_6::messages::status_notification::StatusNotificationRequest;
use rust_ocpp::v1_6::types::{
    ChargePointErrorCode, ChargePointStatus, DiagnosticsStatus, FirmwareStatus,
};
use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Report a connector status change.
    ///
    /// `vendor_id` and `vendor_error_code` map to their own OCPP fields
    /// (`info` is a separate free-text field).
    #[allow(clippy::too_many_arguments)]
    pub async fn status_notification(
        &self,
        connector_id: u32,
        status: ChargePointStatus,
        error_code: ChargePointErrorCode,
        info: Option<String>,
        vendor_id: Option<String>,
        vendor_error_code: Option<String>,
    ) -> OcppResult<()> {
        info!(connector_id, ?status, ?error_code, "StatusNotification");

        let request = StatusNotificationRequest {
            connector_id,
            error_code,
            info,
            status,
            timestamp: Some(Utc::now()),
            vendor_id,
            vendor_error_code,
        };
        let payload = serde_json::to_value(&request)?;

        // Cache the latest status for TriggerMessage(StatusNotification)
        // and the connector_status accessor; 1.6 has no EVSE level
        if let Ok(shared) = self.shared() {
            shared
                .connector_status
                .insert((0, connector_id), payload.clone());
        }

        self.send_or_queue(connector_id, V16Action::StatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report diagnostics upload progress.
    pub async fn diagnostics_status_notification(
        &self,
        status: DiagnosticsStatus,
    ) -> OcppResult<()> {
        info!(?status, "DiagnosticsStatusNotification");

        let request = DiagnosticsStatusNotificationRequest { status };
        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V16Action::DiagnosticsStatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report firmware installation progress.
    pub async fn firmware_status_notification(&self, status: FirmwareStatus) -> OcppResult<()> {
        info!(?status, "FirmwareStatusNotification");

        let request = FirmwareStatusNotificationRequest { status };
        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V16Action::FirmwareStatusNotification, payload)
            .await?;
        Ok(())
    }
}
