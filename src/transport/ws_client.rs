//! Charge-point side WebSocket connector
//!
//! Performs the upgrade handshake towards the central system with the
//! OCPP subprotocol offer, HTTP Basic credentials (profiles 1/2) and the
//! TLS client configuration (profiles 2/3).

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http::header::{AUTHORIZATION, SEC_WEBSOCKET_PROTOCOL};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use super::TransportError;
use crate::security::tls::client_config;
use crate::security::{Credentials, SecurityProfile};
use crate::version::OcppVersion;

pub type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect to the central system.
///
/// `url` already carries the charge-point id as its last path segment.
pub async fn connect(
    url: &str,
    version: OcppVersion,
    profile: SecurityProfile,
    credentials: &Credentials,
) -> Result<ClientStream, TransportError> {
    if profile.requires_tls() && !url.starts_with("wss://") {
        return Err(TransportError::TlsRequired(profile.to_string()));
    }

    let mut request = url
        .into_client_request()
        .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

    request.headers_mut().insert(
        SEC_WEBSOCKET_PROTOCOL,
        version
            .subprotocol()
            .parse()
            .expect("subprotocol token is valid ASCII"),
    );

    match &credentials.basic {
        Some(basic) => {
            let token = BASE64.encode(format!("{}:{}", basic.username, basic.password));
            request.headers_mut().insert(
                AUTHORIZATION,
                format!("Basic {}", token)
                    .parse()
                    .map_err(|_| TransportError::InvalidUrl("Credentials not header-safe".into()))?,
            );
        }
        None => {}
    }

    let connector = match &credentials.tls {
        Some(params) => Some(Connector::Rustls(Arc::new(client_config(params)?))),
        None => None,
    };

    let (stream, response) = connect_async_tls_with_config(request, None, false, connector)
        .await
        .map_err(|e| TransportError::Handshake(e.to_string()))?;

    // The server MUST echo one of the offered subprotocols
    let echoed = response
        .headers()
        .get(SEC_WEBSOCKET_PROTOCOL)
        .and_then(|v| v.to_str().ok());
    match echoed {
        Some(p) if p == version.subprotocol() => {
            info!(url, %version, "Connected to central system");
            Ok(stream)
        }
        other => {
            warn!(url, ?other, "Subprotocol not accepted by central system");
            Err(TransportError::SubprotocolRejected(version.subprotocol()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tls_profile_rejects_plain_url() {
        let err = connect(
            "ws://csms.example/ocpp/CP-1",
            OcppVersion::V16,
            SecurityProfile::TlsBasicAuth,
            &Credentials::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::TlsRequired(_)));
    }

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let err = connect(
            "not a url",
            OcppVersion::V16,
            SecurityProfile::Unsecured,
            &Credentials::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
