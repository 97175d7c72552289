//! v2.0.1 ClearCache command

use rust_ocpp::v2_0_1::messages::clear_cache::{ClearCacheRequest, ClearCacheResponse};
use tracing::info;

use crate::centralsystem::session::StationHandle;
use crate::support::OcppResult;
use crate::version::OcppVersion;

impl StationHandle {
    /// Send ClearCache to a v2.0.1 charging station.
    pub async fn clear_cache_20(&self, request: ClearCacheRequest) -> OcppResult<ClearCacheResponse> {
        info!(charge_point_id = self.charge_point_id(), "v2.0.1 ClearCache");
        self.command(OcppVersion::V201, "ClearCache", &request).await
    }
}
