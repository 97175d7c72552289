//! Security requests

use rust_ocpp::v2_0_1::messages::security_event_notification::SecurityEventNotificationRequest;
use rust_ocpp::v2_0_1::messages::sign_certificate::{
    SignCertificateRequest, SignCertificateResponse,
};
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Report a security event. Queued while offline and never dropped on
    /// overflow.
    pub async fn security_event_notification(
        &self,
        request: SecurityEventNotificationRequest,
    ) -> OcppResult<()> {
        info!("SecurityEventNotification");

        let payload = serde_json::to_value(&request)?;
        self.send_or_queue(0, V201Action::SecurityEventNotification, payload)
            .await?;
        Ok(())
    }

    /// Request a new certificate for this station.
    pub async fn sign_certificate(
        &self,
        request: SignCertificateRequest,
    ) -> OcppResult<SignCertificateResponse> {
        info!("SignCertificate");

        let payload = serde_json::to_value(&request)?;
        let result = self.call_live(V201Action::SignCertificate, payload).await?;
        Ok(serde_json::from_value(result)?)
    }
}
