//! v1.6 CancelReservation command

use rust_ocpp::v1_6::messages::cancel_reservation::{CancelReservationRequest, CancelReservationResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send CancelReservation to a v1.6 charge point.
    pub async fn cancel_reservation(&self, request: CancelReservationRequest) -> OcppResult<CancelReservationResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 CancelReservation");
        self.command(OcppVersion::V16, "CancelReservation", &request).await
    }
}
