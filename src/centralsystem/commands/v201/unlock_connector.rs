//! v2.0.1 UnlockConnector command

use rust_ocpp::v2_0_1::messages::unlock_connector::{UnlockConnectorRequest, UnlockConnectorResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send UnlockConnector to a v2.0.1 charging station.
    pub async fn unlock_connector_20(&self, request: UnlockConnectorRequest) -> OcppResult<UnlockConnectorResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 UnlockConnector");
        self.command(OcppVersion::V201, "UnlockConnector", &request).await
    }
}
