//! v1.6 ClearCache command

use rust_ocpp::v1_6::messages::clear_cache::{ClearCacheRequest, ClearCacheResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ClearCache to a v1.6 charge point.
    pub async fn clear_cache(&self, request: ClearCacheRequest) -> OcppResult<ClearCacheResponse> {
        info!(charge_point_id = self.charge_point_id(), "v1.6 ClearCache");
        self.command(OcppVersion::V16, "ClearCache", &request).await
    }
}
