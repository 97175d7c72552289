//! v1.6 UnlockConnector command

use rust_ocpp::v1_6::messages::unlock_connector::{UnlockConnectorRequest, UnlockConnectorResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send UnlockConnector to a v1.6 charge point.
    pub async fn unlock_connector(&self, request: UnlockConnectorRequest) -> OcppResult<UnlockConnectorResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 UnlockConnector");
        self.command(OcppVersion::V16, "UnlockConnector", &request).await
    }
}
