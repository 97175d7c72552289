//! v2.0.1 TriggerMessage command

use rust_ocpp::v2_0_1::messages::trigger_message::{TriggerMessageRequest, TriggerMessageResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send TriggerMessage to a v2.0.1 charging station.
    pub async fn trigger_message_20(&self, request: TriggerMessageRequest) -> OcppResult<TriggerMessageResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 TriggerMessage");
        self.command(OcppVersion::V201, "TriggerMessage", &request).await
    }
}
