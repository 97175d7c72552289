//! v2.0.1 ChangeAvailability command

use rust_ocpp::v2_0_1::messages::change_availability::{ChangeAvailabilityRequest, ChangeAvailabilityResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ChangeAvailability to a v2.0.1 charging station.
    pub async fn change_availability_20(&self, request: ChangeAvailabilityRequest) -> OcppResult<ChangeAvailabilityResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 ChangeAvailability");
        self.command(OcppVersion::V201, "ChangeAvailability", &request).await
    }
}
