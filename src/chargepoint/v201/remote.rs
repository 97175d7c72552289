//! Inbound CSMS-command routing (charging-station side, OCPP 2.0.1)

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use rust_ocpp::v2_0_1::datatypes::charging_station_type::ChargingStationType;
use rust_ocpp::v2_0_1::datatypes::modem_type::ModemType;
use rust_ocpp::v2_0_1::enumerations::boot_reason_enum_type::BootReasonEnumType;
use rust_ocpp::v2_0_1::enumerations::message_trigger_enum_type::MessageTriggerEnumType;
use rust_ocpp::v2_0_1::enumerations::registration_status_enum_type::RegistrationStatusEnumType;
use rust_ocpp::v2_0_1::enumerations::send_local_list_status_enum_type::SendLocalListStatusEnumType;
use rust_ocpp::v2_0_1::enumerations::trigger_message_status_enum_type::TriggerMessageStatusEnumType;
use rust_ocpp::v2_0_1::enumerations::update_firmware_status_enum_type::UpdateFirmwareStatusEnumType;
use rust_ocpp::v2_0_1::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};
use rust_ocpp::v2_0_1::messages::get_local_list_version::{
    GetLocalListVersionRequest, GetLocalListVersionResponse,
};
use rust_ocpp::v2_0_1::messages::send_local_list::SendLocalListRequest;
use rust_ocpp::v2_0_1::messages::trigger_message::{
    TriggerMessageRequest, TriggerMessageResponse,
};
use rust_ocpp::v2_0_1::messages::update_firmware::UpdateFirmwareRequest;

use crate::chargepoint::session::{
    BootReason, RegistrationStatus, SessionEvent, SessionProtocol, SessionShared,
};
use crate::config::StationIdentity;
use crate::dispatch::{typed, DispatchSide, Dispatcher};
use crate::messages::V201Action;
use crate::rpc::{RpcListener, RpcProblem};
use crate::storage::kv;

use super::events::ChargingStationEventsHandler;

/// RPC listener bound to one charging-station connection.
pub(crate) struct RemoteControl201 {
    shared: Arc<SessionShared>,
    handler: Arc<dyn ChargingStationEventsHandler>,
    dispatcher: Dispatcher,
}

impl RemoteControl201 {
    pub fn new(
        shared: Arc<SessionShared>,
        handler: Arc<dyn ChargingStationEventsHandler>,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            shared.validator.clone(),
            shared.config.connection.ocpp_version,
            DispatchSide::ChargePoint,
        );
        Self {
            shared,
            handler,
            dispatcher,
        }
    }

    async fn route(&self, action: V201Action, payload: Value) -> Result<Value, RpcProblem> {
        let name = action.name();
        let h = &self.handler;
        match action {
            V201Action::CancelReservation => {
                typed(name, payload, |req| h.cancel_reservation(req)).await
            }
            V201Action::CertificateSigned => {
                typed(name, payload, |req| h.certificate_signed(req)).await
            }
            V201Action::ChangeAvailability => {
                typed(name, payload, |req| h.change_availability(req)).await
            }
            V201Action::ClearCache => typed(name, payload, |req| h.clear_cache(req)).await,
            V201Action::ClearChargingProfile => {
                typed(name, payload, |req| h.clear_charging_profile(req)).await
            }
            V201Action::ClearVariableMonitoring => {
                typed(name, payload, |req| h.clear_variable_monitoring(req)).await
            }
            V201Action::DataTransfer => typed(name, payload, |req| h.data_transfer(req)).await,
            V201Action::DeleteCertificate => {
                typed(name, payload, |req| h.delete_certificate(req)).await
            }
            V201Action::GetBaseReport => typed(name, payload, |req| h.get_base_report(req)).await,
            V201Action::GetChargingProfiles => {
                typed(name, payload, |req| h.get_charging_profiles(req)).await
            }
            V201Action::GetCompositeSchedule => {
                typed(name, payload, |req| h.get_composite_schedule(req)).await
            }
            V201Action::GetInstalledCertificateIds => {
                typed(name, payload, |req| h.get_installed_certificate_ids(req)).await
            }
            V201Action::GetLocalListVersion => self.get_local_list_version(payload).await,
            V201Action::GetLog => typed(name, payload, |req| h.get_log(req)).await,
            V201Action::GetTransactionStatus => {
                typed(name, payload, |req| h.get_transaction_status(req)).await
            }
            V201Action::GetVariables => typed(name, payload, |req| h.get_variables(req)).await,
            V201Action::InstallCertificate => {
                typed(name, payload, |req| h.install_certificate(req)).await
            }
            V201Action::RequestStartTransaction => {
                typed(name, payload, |req| h.request_start_transaction(req)).await
            }
            V201Action::RequestStopTransaction => {
                typed(name, payload, |req| h.request_stop_transaction(req)).await
            }
            V201Action::ReserveNow => typed(name, payload, |req| h.reserve_now(req)).await,
            V201Action::Reset => typed(name, payload, |req| h.reset(req)).await,
            V201Action::SendLocalList => self.send_local_list(payload).await,
            V201Action::SetChargingProfile => {
                typed(name, payload, |req| h.set_charging_profile(req)).await
            }
            V201Action::SetMonitoringBase => {
                typed(name, payload, |req| h.set_monitoring_base(req)).await
            }
            V201Action::SetVariableMonitoring => {
                typed(name, payload, |req| h.set_variable_monitoring(req)).await
            }
            V201Action::SetVariables => typed(name, payload, |req| h.set_variables(req)).await,
            V201Action::TriggerMessage => self.trigger_message(payload).await,
            V201Action::UnlockConnector => {
                typed(name, payload, |req| h.unlock_connector(req)).await
            }
            V201Action::UpdateFirmware => self.update_firmware(payload).await,

            // Station-initiated actions never arrive here; the dispatcher's
            // direction check answered them already
            _ => Err(RpcProblem::not_supported(name)),
        }
    }

    // ── Internally handled commands ────────────────────────

    /// Served from the persisted local-list version, no embedder involved.
    async fn get_local_list_version(&self, payload: Value) -> Result<Value, RpcProblem> {
        let kv_store = self.shared.kv.clone();
        typed(
            "GetLocalListVersion",
            payload,
            |_req: GetLocalListVersionRequest| async move {
                let version = kv_store
                    .get_counter(kv::LOCAL_LIST_VERSION_KEY)
                    .await
                    .map_err(|e| RpcProblem::internal(e.to_string()))?;
                Ok(GetLocalListVersionResponse {
                    version_number: version as i32,
                })
            },
        )
        .await
    }

    /// Forwarded to the embedder; an accepted update also persists the new
    /// list version for GetLocalListVersion.
    async fn send_local_list(&self, payload: Value) -> Result<Value, RpcProblem> {
        let h = self.handler.clone();
        let kv_store = self.shared.kv.clone();
        typed(
            "SendLocalList",
            payload,
            |req: SendLocalListRequest| async move {
                let version = req.version_number;
                let response = h.send_local_list(req).await?;
                if response.status == SendLocalListStatusEnumType::Accepted {
                    info!(version, "Local authorization list updated");
                    if let Err(e) = kv_store
                        .set(kv::LOCAL_LIST_VERSION_KEY, &version.to_string())
                        .await
                    {
                        warn!(error = %e, "Failed to persist local list version");
                    }
                }
                Ok(response)
            },
        )
        .await
    }

    async fn trigger_message(&self, payload: Value) -> Result<Value, RpcProblem> {
        let events = self.shared.events.clone();
        typed(
            "TriggerMessage",
            payload,
            |req: TriggerMessageRequest| async move {
                let status = match req.requested_message {
                    MessageTriggerEnumType::BootNotification => {
                        let _ = events.send(SessionEvent::TriggerBootNotification);
                        TriggerMessageStatusEnumType::Accepted
                    }
                    MessageTriggerEnumType::Heartbeat => {
                        let _ = events.send(SessionEvent::TriggerHeartbeat);
                        TriggerMessageStatusEnumType::Accepted
                    }
                    MessageTriggerEnumType::StatusNotification => {
                        let _ = events.send(SessionEvent::TriggerStatusNotifications);
                        TriggerMessageStatusEnumType::Accepted
                    }
                    other => {
                        info!(?other, "Trigger for unsupported message");
                        TriggerMessageStatusEnumType::NotImplemented
                    }
                };
                Ok(TriggerMessageResponse {
                    status,
                    status_info: None,
                })
            },
        )
        .await
    }

    /// Forwarded to the embedder; an accepted update persists the request
    /// id so status survives the installation reboot.
    async fn update_firmware(&self, payload: Value) -> Result<Value, RpcProblem> {
        let h = self.handler.clone();
        let kv_store = self.shared.kv.clone();
        typed(
            "UpdateFirmware",
            payload,
            |req: UpdateFirmwareRequest| async move {
                let request_id = req.request_id;
                let response = h.update_firmware(req).await?;
                if response.status == UpdateFirmwareStatusEnumType::Accepted {
                    if let Err(e) = kv_store
                        .set(kv::SIGNED_FW_UPDATE_ID_KEY, &request_id.to_string())
                        .await
                    {
                        warn!(error = %e, "Failed to persist firmware update id");
                    }
                }
                Ok(response)
            },
        )
        .await
    }
}

#[async_trait]
impl RpcListener for RemoteControl201 {
    async fn call_received(&self, action: &str, payload: Value) -> Result<Value, RpcProblem> {
        self.dispatcher
            .dispatch(action, payload, |payload| async move {
                match V201Action::from_name(action) {
                    Some(known) => self.route(known, payload).await,
                    None => Err(RpcProblem::not_implemented(action)),
                }
            })
            .await
    }

    async fn disconnected(&self) {
        let _ = self.shared.events.send(SessionEvent::RpcDisconnected);
    }
}

// ── V201Protocol ───────────────────────────────────────────────

/// OCPP 2.0.1 half of the session. Unlike 1.6, the boot reason travels on
/// the wire here.
pub(crate) struct V201Protocol {
    identity: StationIdentity,
    boot_reason: BootReason,
    handler: Arc<dyn ChargingStationEventsHandler>,
}

impl V201Protocol {
    pub fn new(
        identity: StationIdentity,
        boot_reason: BootReason,
        handler: Arc<dyn ChargingStationEventsHandler>,
    ) -> Self {
        Self {
            identity,
            boot_reason,
            handler,
        }
    }
}

fn wire_boot_reason(reason: BootReason) -> BootReasonEnumType {
    match reason {
        BootReason::ApplicationReset => BootReasonEnumType::ApplicationReset,
        BootReason::FirmwareUpdate => BootReasonEnumType::FirmwareUpdate,
        BootReason::LocalReset => BootReasonEnumType::LocalReset,
        BootReason::PowerUp => BootReasonEnumType::PowerUp,
        BootReason::RemoteReset => BootReasonEnumType::RemoteReset,
        BootReason::ScheduledReset => BootReasonEnumType::ScheduledReset,
        BootReason::Triggered => BootReasonEnumType::Triggered,
        BootReason::Unknown => BootReasonEnumType::Unknown,
        BootReason::Watchdog => BootReasonEnumType::Watchdog,
    }
}

impl From<RegistrationStatusEnumType> for RegistrationStatus {
    fn from(status: RegistrationStatusEnumType) -> Self {
        match status {
            RegistrationStatusEnumType::Accepted => Self::Accepted,
            RegistrationStatusEnumType::Pending => Self::Pending,
            RegistrationStatusEnumType::Rejected => Self::Rejected,
        }
    }
}

#[async_trait]
impl SessionProtocol for V201Protocol {
    fn boot_request(&self) -> Value {
        let modem = match (&self.identity.iccid, &self.identity.imsi) {
            (None, None) => None,
            (iccid, imsi) => Some(ModemType {
                iccid: iccid.clone(),
                imsi: imsi.clone(),
            }),
        };
        let request = BootNotificationRequest {
            charging_station: ChargingStationType {
                model: self.identity.model.clone(),
                vendor_name: self.identity.vendor.clone(),
                serial_number: self.identity.serial_number.clone(),
                firmware_version: self.identity.firmware_version.clone(),
                modem,
            },
            reason: wire_boot_reason(self.boot_reason),
        };
        serde_json::to_value(&request).unwrap_or_default()
    }

    fn parse_boot_response(&self, payload: &Value) -> Option<(RegistrationStatus, i32)> {
        let response: BootNotificationResponse = serde_json::from_value(payload.clone()).ok()?;
        Some((response.status.into(), response.interval as i32))
    }

    fn listener(&self, shared: &Arc<SessionShared>) -> Arc<dyn RpcListener> {
        Arc::new(RemoteControl201::new(shared.clone(), self.handler.clone()))
    }

    async fn connection_state_changed(&self, connected: bool) {
        self.handler.connection_state_changed(connected).await;
    }

    async fn registration_status_changed(&self, status: RegistrationStatus) {
        self.handler.registration_status_changed(status).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> StationIdentity {
        let mut identity = StationIdentity::new("CS-1", "ACME", "X2");
        identity.iccid = Some("8944".into());
        identity
    }

    struct NoopHandler;

    #[async_trait]
    impl ChargingStationEventsHandler for NoopHandler {}

    #[test]
    fn boot_request_carries_station_and_reason() {
        let protocol = V201Protocol::new(identity(), BootReason::PowerUp, Arc::new(NoopHandler));
        let payload = protocol.boot_request();
        assert_eq!(payload["reason"], "PowerUp");
        assert_eq!(payload["chargingStation"]["vendorName"], "ACME");
        assert_eq!(payload["chargingStation"]["model"], "X2");
        assert_eq!(payload["chargingStation"]["modem"]["iccid"], "8944");
    }

    #[test]
    fn boot_response_parses_status_and_interval() {
        let protocol = V201Protocol::new(identity(), BootReason::PowerUp, Arc::new(NoopHandler));
        let payload = serde_json::json!({
            "currentTime": "2024-01-01T00:00:00.000Z",
            "interval": 120,
            "status": "Pending"
        });
        let (status, interval) = protocol.parse_boot_response(&payload).unwrap();
        assert_eq!(status, RegistrationStatus::Pending);
        assert_eq!(interval, 120);
    }

    #[test]
    fn garbage_boot_response_is_rejected() {
        let protocol = V201Protocol::new(identity(), BootReason::PowerUp, Arc::new(NoopHandler));
        assert!(protocol
            .parse_boot_response(&serde_json::json!({"status": 42}))
            .is_none());
    }
}
