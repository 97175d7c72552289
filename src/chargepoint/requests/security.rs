//! Security-whitepaper requests

use chrono::Utc;

use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::v16_security::{
    GenericStatus, LogStatusNotificationRequest, SecurityEventNotificationRequest,
    SignCertificateRequest, SignCertificateResponse, SignedFirmwareStatusNotificationRequest,
    UploadLogStatus,
};
use crate::messages::v16_security::FirmwareStatus as SignedFirmwareStatus;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Report a security event. Queued while offline and never dropped on
    /// overflow.
    pub async fn security_event_notification(
        &self,
        event_type: &str,
        tech_info: Option<String>,
    ) -> OcppResult<()> {
        info!(event_type, "SecurityEventNotification");

        let request = SecurityEventNotificationRequest {
            event_type: event_type.to_string(),
            timestamp: Utc::now(),
            tech_info,
        };
        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V16Action::SecurityEventNotification, payload)
            .await?;
        Ok(())
    }

    /// Request a new certificate for this station. Returns whether the
    /// central system accepted the signing request.
    pub async fn sign_certificate(&self, csr: &str) -> OcppResult<GenericStatus> {
        info!("SignCertificate");

        let request = SignCertificateRequest {
            csr: csr.to_string(),
        };
        let payload = serde_json::to_value(&request)?;

        let result = self.call_live(V16Action::SignCertificate, payload).await?;
        let response: SignCertificateResponse = serde_json::from_value(result)?;
        Ok(response.status)
    }

    /// Report log upload progress for a GetLog request.
    pub async fn log_status_notification(
        &self,
        status: UploadLogStatus,
        request_id: Option<i32>,
    ) -> OcppResult<()> {
        info!(?status, ?request_id, "LogStatusNotification");

        let request = LogStatusNotificationRequest { status, request_id };
        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V16Action::LogStatusNotification, payload)
            .await?;
        Ok(())
    }

    /// Report signed firmware update progress. When `request_id` is absent
    /// the id persisted at SignedUpdateFirmware time is used, so progress
    /// survives the installation reboot.
    pub async fn signed_firmware_status_notification(
        &self,
        status: SignedFirmwareStatus,
        request_id: Option<i32>,
    ) -> OcppResult<()> {
        let request_id = match request_id {
            Some(id) => Some(id),
            None => {
                let shared = self.shared()?;
                shared
                    .kv
                    .get(crate::storage::kv::SIGNED_FW_UPDATE_ID_KEY)
                    .await?
                    .and_then(|v| v.parse().ok())
            }
        };

        info!(?status, ?request_id, "SignedFirmwareStatusNotification");

        let request = SignedFirmwareStatusNotificationRequest { status, request_id };
        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V16Action::SignedFirmwareStatusNotification, payload)
            .await?;
        Ok(())
    }
}
