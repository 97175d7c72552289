//! v2.0.1 CancelReservation command

use rust_ocpp::v2_0_1::messages::cancel_reservation::{CancelReservationRequest, CancelReservationResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send CancelReservation to a v2.0.1 charging station.
    pub async fn cancel_reservation_20(&self, request: CancelReservationRequest) -> OcppResult<CancelReservationResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 CancelReservation");
        self.command(OcppVersion::V201, "CancelReservation", &request).await
    }
}
