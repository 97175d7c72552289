//! v1.6 TriggerMessage command

use rust_ocpp::v1_6::messages::trigger_message::{TriggerMessageRequest, TriggerMessageResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send TriggerMessage to a v1.6 charge point.
    pub async fn trigger_message(&self, request: TriggerMessageRequest) -> OcppResult<TriggerMessageResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 TriggerMessage");
        self.command(OcppVersion::V16, "TriggerMessage", &request).await
    }
}
