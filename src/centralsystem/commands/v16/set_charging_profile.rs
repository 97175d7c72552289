//! v1.6 SetChargingProfile command

use rust_ocpp::v1_6::messages::set_charging_profile::{SetChargingProfileRequest, SetChargingProfileResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SetChargingProfile to a v1.6 charge point.
    pub async fn set_charging_profile(&self, request: SetChargingProfileRequest) -> OcppResult<SetChargingProfileResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 SetChargingProfile");
        self.command(OcppVersion::V16, "SetChargingProfile", &request).await
    }
}
