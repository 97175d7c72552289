//! v1.6 ChangeConfiguration command

use rust_ocpp::v1_6::messages::change_configuration::{ChangeConfigurationRequest, ChangeConfigurationResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ChangeConfiguration to a v1.6 charge point.
    pub async fn change_configuration(&self, request: ChangeConfigurationRequest) -> OcppResult<ChangeConfigurationResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 ChangeConfiguration");
        self.command(OcppVersion::V16, "ChangeConfiguration", &request).await
    }
}
