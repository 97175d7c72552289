//! Status / progress notifications

use chrono::Utc;
use rust_ocpp::v2_0_1::enumerations::connector_status_enum_type::ConnectorStatusEnumType;
use rust_ocpp::v2_0_1::messages::firmware_status_notification::FirmwareStatusNotificationRequest;
use rust_ocpp::v2_0_1::messages::log_status_notification::LogStatusNotificationRequest;
use rust_ocpp::v2_0_1::messages::notify_event::NotifyEventRequest;
use rust_ocpp::v2_0_1::messages::notify_report::NotifyReportRequest;
use rust_ocpp::v2_0_1::messages::status_notification::StatusNotificationRequest;
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Report a connector status change.
    pub async fn status_notification(
        &self,
        evse_id: u32,
        connector_id: u32,
        connector_status: ConnectorStatusEnumType,
    ) -> OcppResult<()> {
        info!(evse_id, connector_id, ?connector_status, "StatusNotification");

        let request = StatusNotificationRequest {
            connector_id: connector_id as i32,
            connector_status,
            evse_id: evse_id as i32,
            timestamp: Utc::now(),
        };
        let payload = serde_json::to_value(&request)?;

        // Cache the latest status for TriggerMessage(StatusNotification)
        // and the connector_status accessor
        if let Ok(shared) = self.shared() {
            shared
                .connector_status
                .insert((evse_id, connector_id), payload.clone());
        }

        self.send_or_queue(connector_id, V201Action::StatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report firmware installation progress.
    pub async fn firmware_status_notification(
        &self,
        request: FirmwareStatusNotificationRequest,
    ) -> OcppResult<()> {
        info!(status = ?request.status, "FirmwareStatusNotification");

        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V201Action::FirmwareStatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report log upload progress for a GetLog request.
    pub async fn log_status_notification(
        &self,
        request: LogStatusNotificationRequest,
    ) -> OcppResult<()> {
        info!(status = ?request.status, "LogStatusNotification");

        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V201Action::LogStatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report monitored-variable events.
    pub async fn notify_event(&self, request: NotifyEventRequest) -> OcppResult<()> {
        info!(events = request.event_data.len(), "NotifyEvent");

        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V201Action::NotifyEvent, payload)
            .await?;
        Ok(())
    }

    /// Deliver one part of a device-model report.
    pub async fn notify_report(&self, request: NotifyReportRequest) -> OcppResult<()> {
        info!(request_id = request.request_id, "NotifyReport");

        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V201Action::NotifyReport, payload)
            .await?;
        Ok(())
    }
}
