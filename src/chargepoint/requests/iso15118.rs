//! ISO 15118 (Plug-and-Charge) tunnelled requests

use tracing::info;

use crate::chargepoint::ChargePoint;
use crate::messages::v16_security::{
    CertificateAction, Get15118EVCertificateRequest, Get15118EVCertificateResponse,
    GetCertificateStatusRequest, GetCertificateStatusResponse, OcspRequestData,
};
use crate::messages::V16Action;
use crate::support::OcppResult;

impl ChargePoint {
    /// Forward an EV's EXI certificate installation/update request to the
    /// central system.
    pub async fn iso15118_get_ev_certificate(
        &self,
        schema_version: &str,
        action: CertificateAction,
        exi_request: &str,
    ) -> OcppResult<Get15118EVCertificateResponse> {
        info!(schema_version, ?action, "Get15118EVCertificate");

        let request = Get15118EVCertificateRequest {
            iso15118_schema_version: schema_version.to_string(),
            action,
            exi_request: exi_request.to_string(),
        };
        let payload = serde_json::to_value(&request)?;

        let result = self
            .call_live(V16Action::Get15118EVCertificate, payload)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Retrieve the OCSP certificate status for a contract certificate.
    /// `Ok` is success; failures surface as errors, never as a printed
    /// success.
    pub async fn iso15118_get_certificate_status(
        &self,
        ocsp_request_data: OcspRequestData,
    ) -> OcppResult<GetCertificateStatusResponse> {
        info!(
            serial_number = ocsp_request_data.serial_number.as_str(),
            "GetCertificateStatus"
        );

        let request = GetCertificateStatusRequest { ocsp_request_data };
        let payload = serde_json::to_value(&request)?;

        let result = self
            .call_live(V16Action::GetCertificateStatus, payload)
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}
