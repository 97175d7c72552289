//! Authorize request

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::types::IdTagInfo;
use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Ask the central system whether `id_tag` may charge.
    ///
    /// Needs a live Accepted session; authorization cannot be deferred.
    pub async fn authorize(&self, id_tag: &str) -> OcppResult<IdTagInfo> {
        info!(id_tag, "Authorize");

        let request = AuthorizeRequest {
            id_tag: id_tag.to_string(),
        };
        let payload = serde_json::to_value(&request)?;

        let result = self.call_live(V16Action::Authorize, payload).await?;
        let response: AuthorizeResponse = serde_json::from_value(result)?;
        Ok(response.id_tag_info)
    }
}
