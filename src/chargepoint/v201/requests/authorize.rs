//! Authorize request

use rust_ocpp::v2_0_1::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Ask the CSMS whether an id token may charge.
    ///
    /// Needs a live Accepted session; authorization cannot be deferred.
    pub async fn authorize(&self, request: AuthorizeRequest) -> OcppResult<AuthorizeResponse> {
        info!("Authorize");

        let payload = serde_json::to_value(&request)?;
        let result = self.call_live(V201Action::Authorize, payload).await?;
        Ok(serde_json::from_value(result)?)
    }
}
