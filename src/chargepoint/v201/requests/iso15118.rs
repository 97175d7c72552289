//! ISO 15118 (Plug-and-Charge) tunnelled requests

use rust_ocpp::v2_0_1::messages::get_15118ev_certificate::{
    Get15118EVCertificateRequest, Get15118EVCertificateResponse,
};
use rust_ocpp::v2_0_1::messages::get_certificate_status::{
    GetCertificateStatusRequest, GetCertificateStatusResponse,
};
use tracing::info;

use crate::chargepoint::v201::ChargingStation;
use crate::messages::V201Action;
use crate::support::OcppResult;

impl ChargingStation {
    /// Forward an EV's EXI certificate installation/update request to the
    /// CSMS.
    pub async fn iso15118_get_ev_certificate(
        &self,
        request: Get15118EVCertificateRequest,
    ) -> OcppResult<Get15118EVCertificateResponse> {
        info!("Get15118EVCertificate");

        let payload = serde_json::to_value(&request)?;
        let result = self
            .call_live(V201Action::Get15118EVCertificate, payload)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Retrieve the OCSP certificate status for a contract certificate.
    /// `Ok` is success; failures surface as errors.
    pub async fn iso15118_get_certificate_status(
        &self,
        request: GetCertificateStatusRequest,
    ) -> OcppResult<GetCertificateStatusResponse> {
        info!("GetCertificateStatus");

        let payload = serde_json::to_value(&request)?;
        let result = self
            .call_live(V201Action::GetCertificateStatus, payload)
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}
