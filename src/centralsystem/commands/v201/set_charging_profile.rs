//! v2.0.1 SetChargingProfile command

use rust_ocpp::v2_0_1::messages::set_charging_profile::{SetChargingProfileRequest, SetChargingProfileResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send SetChargingProfile to a v2.0.1 charging station.
    pub async fn set_charging_profile_20(&self, request: SetChargingProfileRequest) -> OcppResult<SetChargingProfileResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 SetChargingProfile");
        self.command(OcppVersion::V201, "SetChargingProfile", &request).await
    }
}
