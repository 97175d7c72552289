//! Inbound remote-command routing (charge-point side)
//!
//! Implements the RPC listener for a charge-point connection: every Call
//! from the central system is schema-validated, converted to its typed
//! request and routed either to the stack itself (trigger messages, local
//! list version) or to the embedder's events handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use rust_ocpp::v1_6::messages::get_local_list_version::{
    GetLocalListVersionRequest, GetLocalListVersionResponse,
};
use rust_ocpp::v1_6::messages::trigger_message::{TriggerMessageRequest, TriggerMessageResponse};
use rust_ocpp::v1_6::types::{MessageTrigger, TriggerMessageStatus, UpdateStatus};

use crate::dispatch::{typed, DispatchSide, Dispatcher};
use crate::messages::v16_security::{
    self as sec, ExtendedTrigger, ExtendedTriggerMessageRequest, ExtendedTriggerMessageResponse,
    Iso15118TriggerMessageRequest, Iso15118TriggerMessageResponse, SignedUpdateFirmwareRequest,
    SignedUpdateFirmwareResponse, UpdateFirmwareStatus,
};
use crate::messages::V16Action;
use crate::rpc::{RpcListener, RpcProblem};
use crate::storage::kv;

use rust_ocpp::v1_6::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};

use crate::config::StationIdentity;

use super::events::ChargePointEventsHandler;
use super::session::{RegistrationStatus, SessionEvent, SessionProtocol, SessionShared};

/// RPC listener bound to one charge-point connection.
pub(crate) struct RemoteControl {
    shared: Arc<SessionShared>,
    handler: Arc<dyn ChargePointEventsHandler>,
    dispatcher: Dispatcher,
}

impl RemoteControl {
    pub fn new(shared: Arc<SessionShared>, handler: Arc<dyn ChargePointEventsHandler>) -> Self {
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

    async fn route(&self, action: V16Action, payload: Value) -> Result<Value, RpcProblem> {
        let name = action.name();
        let h = &self.handler;
        match action {
            // ── Core profile ───────────────────────────────
            V16Action::CancelReservation => {
                typed(name, payload, |req| h.cancel_reservation(req)).await
            }
            V16Action::ChangeAvailability => {
                typed(name, payload, |req| h.change_availability(req)).await
            }
            V16Action::ChangeConfiguration => {
                typed(name, payload, |req| h.change_configuration(req)).await
            }
            V16Action::ClearCache => typed(name, payload, |req| h.clear_cache(req)).await,
            V16Action::ClearChargingProfile => {
                typed(name, payload, |req| h.clear_charging_profile(req)).await
            }
            V16Action::DataTransfer => typed(name, payload, |req| h.data_transfer(req)).await,
            V16Action::GetCompositeSchedule => {
                typed(name, payload, |req| h.get_composite_schedule(req)).await
            }
            V16Action::GetConfiguration => {
                typed(name, payload, |req| h.get_configuration(req)).await
            }
            V16Action::GetDiagnostics => typed(name, payload, |req| h.get_diagnostics(req)).await,
            V16Action::GetLocalListVersion => self.get_local_list_version(payload).await,
            V16Action::RemoteStartTransaction => {
                typed(name, payload, |req| h.remote_start_transaction(req)).await
            }
            V16Action::RemoteStopTransaction => {
                typed(name, payload, |req| h.remote_stop_transaction(req)).await
            }
            V16Action::ReserveNow => typed(name, payload, |req| h.reserve_now(req)).await,
            V16Action::Reset => typed(name, payload, |req| h.reset(req)).await,
            V16Action::SendLocalList => self.send_local_list(payload).await,
            V16Action::SetChargingProfile => {
                typed(name, payload, |req| h.set_charging_profile(req)).await
            }
            V16Action::TriggerMessage => self.trigger_message(payload).await,
            V16Action::UnlockConnector => {
                typed(name, payload, |req| h.unlock_connector(req)).await
            }
            V16Action::UpdateFirmware => typed(name, payload, |req| h.update_firmware(req)).await,

            // ── Security extensions ────────────────────────
            V16Action::CertificateSigned => {
                typed(name, payload, |req| h.certificate_signed(req)).await
            }
            V16Action::DeleteCertificate => {
                typed(name, payload, |req| h.delete_certificate(req)).await
            }
            V16Action::ExtendedTriggerMessage => self.extended_trigger_message(payload).await,
            V16Action::GetInstalledCertificateIds => {
                typed(name, payload, |req| h.get_installed_certificate_ids(req)).await
            }
            V16Action::GetLog => typed(name, payload, |req| h.get_log(req)).await,
            V16Action::InstallCertificate => {
                typed(name, payload, |req| h.install_certificate(req)).await
            }
            V16Action::SignedUpdateFirmware => self.signed_update_firmware(payload).await,

            // ── ISO 15118 ──────────────────────────────────
            V16Action::Iso15118GetInstalledCertificateIds => {
                typed(name, payload, |req| {
                    h.iso15118_get_installed_certificate_ids(req)
                })
                .await
            }
            V16Action::Iso15118InstallCertificate => {
                typed(name, payload, |req| h.iso15118_install_certificate(req)).await
            }
            V16Action::Iso15118TriggerMessage => self.iso15118_trigger_message(payload).await,

            // Charge-point initiated actions never arrive here; the
            // dispatcher's direction check answered them already
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
                    list_version: version as i32,
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
            |req: rust_ocpp::v1_6::messages::send_local_list::SendLocalListRequest| async move {
                let version = req.list_version;
                let response = h.send_local_list(req).await?;
                if response.status == UpdateStatus::Accepted {
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
                    MessageTrigger::BootNotification => {
                        let _ = events.send(SessionEvent::TriggerBootNotification);
                        TriggerMessageStatus::Accepted
                    }
                    MessageTrigger::Heartbeat => {
                        let _ = events.send(SessionEvent::TriggerHeartbeat);
                        TriggerMessageStatus::Accepted
                    }
                    MessageTrigger::StatusNotification => {
                        let _ = events.send(SessionEvent::TriggerStatusNotifications);
                        TriggerMessageStatus::Accepted
                    }
                    other => {
                        info!(?other, "Trigger for unsupported message");
                        TriggerMessageStatus::NotImplemented
                    }
                };
                Ok(TriggerMessageResponse { status })
            },
        )
        .await
    }

    async fn extended_trigger_message(&self, payload: Value) -> Result<Value, RpcProblem> {
        let events = self.shared.events.clone();
        typed(
            "ExtendedTriggerMessage",
            payload,
            |req: ExtendedTriggerMessageRequest| async move {
                let status = match req.requested_message {
                    ExtendedTrigger::BootNotification => {
                        let _ = events.send(SessionEvent::TriggerBootNotification);
                        sec::TriggerMessageStatus::Accepted
                    }
                    ExtendedTrigger::Heartbeat => {
                        let _ = events.send(SessionEvent::TriggerHeartbeat);
                        sec::TriggerMessageStatus::Accepted
                    }
                    ExtendedTrigger::StatusNotification => {
                        let _ = events.send(SessionEvent::TriggerStatusNotifications);
                        sec::TriggerMessageStatus::Accepted
                    }
                    other => {
                        info!(?other, "Extended trigger for unsupported message");
                        sec::TriggerMessageStatus::NotImplemented
                    }
                };
                Ok(ExtendedTriggerMessageResponse { status })
            },
        )
        .await
    }

    async fn iso15118_trigger_message(&self, payload: Value) -> Result<Value, RpcProblem> {
        let h = self.handler.clone();
        typed(
            "Iso15118TriggerMessage",
            payload,
            |_req: Iso15118TriggerMessageRequest| async move {
                let status = if h.iso15118_trigger_sign_certificate().await {
                    sec::TriggerMessageStatus::Accepted
                } else {
                    sec::TriggerMessageStatus::Rejected
                };
                Ok(Iso15118TriggerMessageResponse { status })
            },
        )
        .await
    }

    /// Forwarded to the embedder; an accepted update persists the request
    /// id so status survives the installation reboot.
    async fn signed_update_firmware(&self, payload: Value) -> Result<Value, RpcProblem> {
        let h = self.handler.clone();
        let kv_store = self.shared.kv.clone();
        typed(
            "SignedUpdateFirmware",
            payload,
            |req: SignedUpdateFirmwareRequest| async move {
                let request_id = req.request_id;
                let response: SignedUpdateFirmwareResponse = h.signed_update_firmware(req).await?;
                if response.status == UpdateFirmwareStatus::Accepted {
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
impl RpcListener for RemoteControl {
    async fn call_received(&self, action: &str, payload: Value) -> Result<Value, RpcProblem> {
        self.dispatcher
            .dispatch(action, payload, |payload| async move {
                match V16Action::from_name(action) {
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

// ── V16Protocol ────────────────────────────────────────────────

/// OCPP 1.6 half of the session: boot payload, response parsing and the
/// typed events-handler bridge.
pub(crate) struct V16Protocol {
    identity: StationIdentity,
    handler: Arc<dyn ChargePointEventsHandler>,
}

impl V16Protocol {
    pub fn new(identity: StationIdentity, handler: Arc<dyn ChargePointEventsHandler>) -> Self {
        Self { identity, handler }
    }
}

#[async_trait]
impl SessionProtocol for V16Protocol {
    fn boot_request(&self) -> Value {
        let request = BootNotificationRequest {
            charge_point_vendor: self.identity.vendor.clone(),
            charge_point_model: self.identity.model.clone(),
            charge_point_serial_number: self.identity.serial_number.clone(),
            charge_box_serial_number: None,
            firmware_version: self.identity.firmware_version.clone(),
            iccid: self.identity.iccid.clone(),
            imsi: self.identity.imsi.clone(),
            meter_type: self.identity.meter_type.clone(),
            meter_serial_number: self.identity.meter_serial_number.clone(),
        };
        serde_json::to_value(&request).unwrap_or_default()
    }

    fn parse_boot_response(&self, payload: &Value) -> Option<(RegistrationStatus, i32)> {
        let response: BootNotificationResponse = serde_json::from_value(payload.clone()).ok()?;
        Some((response.status.into(), response.interval as i32))
    }

    fn listener(&self, shared: &Arc<SessionShared>) -> Arc<dyn RpcListener> {
        Arc::new(RemoteControl::new(shared.clone(), self.handler.clone()))
    }

    async fn connection_state_changed(&self, connected: bool) {
        self.handler.connection_state_changed(connected).await;
    }

    async fn registration_status_changed(&self, status: RegistrationStatus) {
        self.handler.registration_status_changed(status).await;
    }
}
