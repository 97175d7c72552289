//! Central-system side WebSocket acceptor
//!
//! Upgrades an accepted TCP stream, negotiating the OCPP subprotocol and
//! capturing the charge-point id from the URL path plus the HTTP Basic
//! credentials for the events handler to verify.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use percent_encoding::percent_decode_str;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response,
};
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

use super::TransportError;
use crate::version::OcppVersion;

pub type ServerStream = WebSocketStream<TcpStream>;

/// What the handshake revealed about the connecting station.
#[derive(Debug, Clone)]
pub struct AcceptedConnection {
    pub charge_point_id: String,
    pub version: OcppVersion,
    /// Decoded `Authorization: Basic` credentials, when presented.
    pub basic_credentials: Option<(String, String)>,
}

/// Extract the charge point id from the WebSocket request path.
/// The id is the last non-empty path segment, percent-decoded.
pub fn extract_charge_point_id(path: &str) -> Option<String> {
    let id = path.trim_end_matches('/').rsplit('/').next()?;
    if id.is_empty() {
        return None;
    }
    percent_decode_str(id)
        .decode_utf8()
        .ok()
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Pick the first subprotocol offered by the client that we support,
/// honoring the server's preference order.
pub fn negotiate_subprotocol(
    requested: &str,
    supported: &[OcppVersion],
) -> Option<OcppVersion> {
    let offered: Vec<&str> = requested.split(',').map(|s| s.trim()).collect();
    supported
        .iter()
        .copied()
        .find(|v| offered.contains(&v.subprotocol()))
}

/// Decode an `Authorization: Basic` header value into (username, password).
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let token = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(token.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Perform the server-side WebSocket upgrade.
///
/// Rejects the handshake when no offered subprotocol is supported or no
/// charge-point id can be derived from the path; otherwise echoes the
/// negotiated subprotocol back to the station.
pub async fn accept(
    stream: TcpStream,
    supported: &[OcppVersion],
) -> Result<(ServerStream, AcceptedConnection), TransportError> {
    let supported = supported.to_vec();
    let mut accepted: Option<AcceptedConnection> = None;

    let ws_stream = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, mut response: Response| {
        let path = req.uri().path();

        let charge_point_id = match extract_charge_point_id(path) {
            Some(id) => id,
            None => {
                warn!(path, "No charge point id in connection path");
                return Err(bad_request("Missing charge point identifier"));
            }
        };

        let requested = req
            .headers()
            .get("Sec-WebSocket-Protocol")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let version = match negotiate_subprotocol(requested, &supported) {
            Some(v) => v,
            None => {
                warn!(
                    charge_point_id = charge_point_id.as_str(),
                    requested, "No common OCPP subprotocol"
                );
                return Err(bad_request("Unsupported OCPP subprotocol"));
            }
        };

        response.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            version
                .subprotocol()
                .parse()
                .expect("subprotocol token is valid ASCII"),
        );

        let basic_credentials = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic_auth);

        info!(
            charge_point_id = charge_point_id.as_str(),
            %version,
            authenticated = basic_credentials.is_some(),
            "WebSocket handshake"
        );

        accepted = Some(AcceptedConnection {
            charge_point_id,
            version,
            basic_credentials,
        });
        Ok(response)
    })
    .await
    .map_err(|e| TransportError::Handshake(e.to_string()))?;

    let accepted =
        accepted.ok_or_else(|| TransportError::Handshake("Handshake produced no identity".into()))?;
    Ok((ws_stream, accepted))
}

fn bad_request(reason: &str) -> ErrorResponse {
    let mut response = ErrorResponse::new(Some(reason.to_string()));
    *response.status_mut() = http::StatusCode::BAD_REQUEST;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_last_path_segment() {
        assert_eq!(extract_charge_point_id("/ocpp/CP-1").as_deref(), Some("CP-1"));
        assert_eq!(extract_charge_point_id("/CP-1").as_deref(), Some("CP-1"));
        assert_eq!(
            extract_charge_point_id("/ocpp/v16/CP-1/").as_deref(),
            Some("CP-1")
        );
        assert_eq!(extract_charge_point_id("/"), None);
    }

    #[test]
    fn id_is_percent_decoded() {
        assert_eq!(
            extract_charge_point_id("/ocpp/CP%2001").as_deref(),
            Some("CP 01")
        );
    }

    #[test]
    fn negotiation_prefers_server_order() {
        let supported = [OcppVersion::V201, OcppVersion::V16];
        assert_eq!(
            negotiate_subprotocol("ocpp1.6, ocpp2.0.1", &supported),
            Some(OcppVersion::V201)
        );
        assert_eq!(
            negotiate_subprotocol("ocpp1.6", &supported),
            Some(OcppVersion::V16)
        );
        assert_eq!(negotiate_subprotocol("ocpp2.1", &supported), None);
        assert_eq!(negotiate_subprotocol("", &supported), None);
    }

    #[test]
    fn basic_auth_decoding() {
        // "CP-1:secret"
        assert_eq!(
            parse_basic_auth("Basic Q1AtMTpzZWNyZXQ="),
            Some(("CP-1".to_string(), "secret".to_string()))
        );
        assert_eq!(parse_basic_auth("Bearer xyz"), None);
        assert_eq!(parse_basic_auth("Basic ???"), None);
    }
}
