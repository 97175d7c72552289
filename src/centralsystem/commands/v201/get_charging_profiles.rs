//! v2.0.1 GetChargingProfiles command

use rust_ocpp::v2_0_1::messages::get_charging_profiles::{GetChargingProfilesRequest, GetChargingProfilesResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send GetChargingProfiles to a v2.0.1 charging station.
    pub async fn get_charging_profiles(&self, request: GetChargingProfilesRequest) -> OcppResult<GetChargingProfilesResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 GetChargingProfiles");
        self.command(OcppVersion::V201, "GetChargingProfiles", &request).await
    }
}
