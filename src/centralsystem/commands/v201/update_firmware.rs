//! v2.0.1 UpdateFirmware command

use rust_ocpp::v2_0_1::messages::update_firmware::{UpdateFirmwareRequest, UpdateFirmwareResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send UpdateFirmware to a v2.0.1 charging station.
    pub async fn update_firmware_20(&self, request: UpdateFirmwareRequest) -> OcppResult<UpdateFirmwareResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 UpdateFirmware");
        self.command(OcppVersion::V201, "UpdateFirmware", &request).await
    }
}
