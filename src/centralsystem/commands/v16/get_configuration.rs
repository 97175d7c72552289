//! v1.6 GetConfiguration command

use rust_ocpp::v1_6::messages::get_configuration::{GetConfigurationRequest, GetConfigurationResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetConfiguration to a v1.6 charge point.
    pub async fn get_configuration(&self, request: GetConfigurationRequest) -> OcppResult<GetConfigurationResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 GetConfiguration");
        self.command(OcppVersion::V16, "GetConfiguration", &request).await
    }
}
