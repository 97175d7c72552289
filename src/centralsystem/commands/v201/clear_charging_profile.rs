//! v2.0.1 ClearChargingProfile command

use rust_ocpp::v2_0_1::messages::clear_charging_profile::{ClearChargingProfileRequest, ClearChargingProfileResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ClearChargingProfile to a v2.0.1 charging station.
    pub async fn clear_charging_profile_20(&self, request: ClearChargingProfileRequest) -> OcppResult<ClearChargingProfileResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 ClearChargingProfile");
        self.command(OcppVersion::V201, "ClearChargingProfile", &request).await
    }
}
