//! v1.6 ClearChargingProfile command

use rust_ocpp::v1_6::messages::clear_charging_profile::{ClearChargingProfileRequest, ClearChargingProfileResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ClearChargingProfile to a v1.6 charge point.
    pub async fn clear_charging_profile(&self, request: ClearChargingProfileRequest) -> OcppResult<ClearChargingProfileResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 ClearChargingProfile");
        self.command(OcppVersion::V16, "ClearChargingProfile", &request).await
    }
}
