//! Inbound station-message routing (central-system side)
//!
//! RPC listener bound to one station connection. Heartbeats are answered
//! by the stack with the server's clock; everything else is converted to
//! its typed request and routed to the backend's events handler.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use rust_ocpp::v1_6::messages::heart_beat::HeartbeatResponse;
use rust_ocpp::v2_0_1::messages::heartbeat::HeartbeatResponse as HeartbeatResponse20;

use crate::dispatch::{typed, DispatchSide, Dispatcher};
use crate::messages::{V16Action, V201Action};
use crate::rpc::{RpcListener, RpcProblem};
use crate::version::OcppVersion;

use super::events::CentralSystemEventsHandler;
use super::session::{ServerSession, SessionRegistry};

/// RPC listener for one bound station connection.
pub(crate) struct StationListener {
    session: Arc<ServerSession>,
    handler: Arc<dyn CentralSystemEventsHandler>,
    registry: Arc<SessionRegistry>,
    dispatcher: Dispatcher,
}

impl StationListener {
    pub fn new(
        session: Arc<ServerSession>,
        handler: Arc<dyn CentralSystemEventsHandler>,
        registry: Arc<SessionRegistry>,
        validator: Arc<crate::schemas::SchemaValidator>,
    ) -> Self {
        let dispatcher = Dispatcher::new(validator, session.version, DispatchSide::CentralSystem);
        Self {
            session,
            handler,
            registry,
            dispatcher,
        }
    }

    async fn route_v16(&self, action: V16Action, payload: Value) -> Result<Value, RpcProblem> {
        let name = action.name();
        let id = self.session.charge_point_id.as_str();
        let h = &self.handler;
        match action {
            V16Action::Authorize => typed(name, payload, |req| h.authorize(id, req)).await,
            V16Action::BootNotification => {
                typed(name, payload, |req| h.boot_notification(id, req)).await
            }
            V16Action::DataTransfer => typed(name, payload, |req| h.data_transfer(id, req)).await,
            V16Action::DiagnosticsStatusNotification => {
                typed(name, payload, |req| {
                    h.diagnostics_status_notification(id, req)
                })
                .await
            }
            V16Action::FirmwareStatusNotification => {
                typed(name, payload, |req| h.firmware_status_notification(id, req)).await
            }
            V16Action::Heartbeat => {
                typed(
                    name,
                    payload,
                    |_req: rust_ocpp::v1_6::messages::heart_beat::HeartbeatRequest| async move {
                        Ok(HeartbeatResponse {
                            current_time: Utc::now(),
                        })
                    },
                )
                .await
            }
            V16Action::MeterValues => typed(name, payload, |req| h.meter_values(id, req)).await,
            V16Action::StartTransaction => {
                typed(name, payload, |req| h.start_transaction(id, req)).await
            }
            V16Action::StatusNotification => {
                typed(name, payload, |req| h.status_notification(id, req)).await
            }
            V16Action::StopTransaction => {
                typed(name, payload, |req| h.stop_transaction(id, req)).await
            }
            V16Action::LogStatusNotification => {
                typed(name, payload, |req| h.log_status_notification(id, req)).await
            }
            V16Action::SecurityEventNotification => {
                typed(name, payload, |req| h.security_event_notification(id, req)).await
            }
            V16Action::SignCertificate => {
                typed(name, payload, |req| h.sign_certificate(id, req)).await
            }
            V16Action::SignedFirmwareStatusNotification => {
                typed(name, payload, |req| {
                    h.signed_firmware_status_notification(id, req)
                })
                .await
            }
            V16Action::Get15118EVCertificate => {
                typed(name, payload, |req| h.get_15118_ev_certificate(id, req)).await
            }
            V16Action::GetCertificateStatus => {
                typed(name, payload, |req| h.get_certificate_status(id, req)).await
            }
            _ => Err(RpcProblem::not_supported(name)),
        }
    }

    async fn route_v201(&self, action: V201Action, payload: Value) -> Result<Value, RpcProblem> {
        let name = action.name();
        let id = self.session.charge_point_id.as_str();
        let h = &self.handler;
        match action {
            V201Action::Authorize => typed(name, payload, |req| h.authorize_20(id, req)).await,
            V201Action::BootNotification => {
                typed(name, payload, |req| h.boot_notification_20(id, req)).await
            }
            V201Action::DataTransfer => {
                typed(name, payload, |req| h.data_transfer_20(id, req)).await
            }
            V201Action::FirmwareStatusNotification => {
                typed(name, payload, |req| {
                    h.firmware_status_notification_20(id, req)
                })
                .await
            }
            V201Action::Heartbeat => {
                typed(
                    name,
                    payload,
                    |_req: rust_ocpp::v2_0_1::messages::heartbeat::HeartbeatRequest| async move {
                        Ok(HeartbeatResponse20 {
                            current_time: Utc::now(),
                        })
                    },
                )
                .await
            }
            V201Action::LogStatusNotification => {
                typed(name, payload, |req| h.log_status_notification_20(id, req)).await
            }
            V201Action::MeterValues => typed(name, payload, |req| h.meter_values_20(id, req)).await,
            V201Action::NotifyEvent => typed(name, payload, |req| h.notify_event(id, req)).await,
            V201Action::NotifyReport => typed(name, payload, |req| h.notify_report(id, req)).await,
            V201Action::SecurityEventNotification => {
                typed(name, payload, |req| {
                    h.security_event_notification_20(id, req)
                })
                .await
            }
            V201Action::StatusNotification => {
                typed(name, payload, |req| h.status_notification_20(id, req)).await
            }
            V201Action::TransactionEvent => {
                typed(name, payload, |req| h.transaction_event(id, req)).await
            }
            _ => Err(RpcProblem::not_supported(name)),
        }
    }
}

#[async_trait]
impl RpcListener for StationListener {
    async fn call_received(&self, action: &str, payload: Value) -> Result<Value, RpcProblem> {
        self.dispatcher
            .dispatch(action, payload, |payload| async move {
                match self.session.version {
                    OcppVersion::V16 => match V16Action::from_name(action) {
                        Some(known) => self.route_v16(known, payload).await,
                        None => Err(RpcProblem::not_implemented(action)),
                    },
                    OcppVersion::V201 => match V201Action::from_name(action) {
                        Some(known) => self.route_v201(known, payload).await,
                        None => Err(RpcProblem::not_implemented(action)),
                    },
                }
            })
            .await
    }

    async fn disconnected(&self) {
        info!(
            charge_point_id = self.session.charge_point_id.as_str(),
            "Station connection closed"
        );
        self.registry.unregister(&self.session);
        self.handler
            .station_disconnected(&self.session.charge_point_id)
            .await;
    }
}
