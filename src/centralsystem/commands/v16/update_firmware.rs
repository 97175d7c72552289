//! v1.6 UpdateFirmware command

use rust_ocpp::v1_6::messages::update_firmware::UpdateFirmwareRequest;
use serde_json::Value;
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send UpdateFirmware to a v1.6 charge point.
    ///
    /// The v1.6 response carries no status; a successful call means the
    /// station acknowledged the request.
    pub async fn update_firmware(&self, request: UpdateFirmwareRequest) -> OcppResult<()> {
        info!(
            charge_point_id = self.charge_point_id(),
            location = request.location.as_str(),
            "v1.6 UpdateFirmware"
        );
        let _ack: Value = self
            .command(OcppVersion::V16, "UpdateFirmware", &request)
            .await?;
        Ok(())
    }
}
