//! v1.6 ChangeAvailability command

use rust_ocpp::v1_6::messages::change_availability::{ChangeAvailabilityRequest, ChangeAvailabilityResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ChangeAvailability to a v1.6 charge point.
    pub async fn change_availability(&self, request: ChangeAvailabilityRequest) -> OcppResult<ChangeAvailabilityResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 ChangeAvailability");
        self.command(OcppVersion::V16, "ChangeAvailability", &request).await
    }
}
