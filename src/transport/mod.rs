//! WebSocket transport glue
//!
//! The RPC endpoint is transport-agnostic: it writes outbound text into a
//! channel and receives inbound text through `process_incoming`. This
//! module owns the actual WebSocket streams on both sides and the
//! [`drive`] loop pumping them.

pub mod ws_client;
pub mod ws_server;

use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, warn};

use crate::rpc::RpcEndpoint;
use crate::support::ShutdownSignal;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("{0} requires a wss:// URL")]
    TlsRequired(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] crate::security::tls::TlsError),

    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    #[error("Peer did not accept subprotocol {0}")]
    SubprotocolRejected(&'static str),
}

/// Pump one WebSocket connection until either side ends it, then mark the
/// endpoint closed (which fails all pending calls with `ConnectionLost`).
pub async fn drive<S>(
    ws_stream: S,
    mut outbound: mpsc::UnboundedReceiver<String>,
    endpoint: Arc<RpcEndpoint>,
    shutdown: Option<ShutdownSignal>,
) where
    S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
{
    let (mut sink, mut stream) = ws_stream.split();
    let label = endpoint.label().to_string();

    let send_task = async {
        while let Some(text) = outbound.recv().await {
            debug!(endpoint = label.as_str(), "-> {}", text);
            if let Err(e) = sink.send(Message::Text(text)).await {
                error!(endpoint = label.as_str(), error = %e, "Send failed");
                break;
            }
        }
        // Writer channel closed by the session: say goodbye properly
        let _ = sink.send(Message::Close(None)).await;
    };

    let recv_task = async {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    debug!(endpoint = label.as_str(), "<- {}", text);
                    endpoint.process_incoming(&text).await;
                }
                // Pings are answered by tungstenite during read
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(frame)) => {
                    debug!(endpoint = label.as_str(), ?frame, "Close frame received");
                    break;
                }
                Ok(Message::Binary(data)) => {
                    warn!(
                        endpoint = label.as_str(),
                        bytes = data.len(),
                        "Binary message ignored (OCPP-J is text-only)"
                    );
                }
                Ok(Message::Frame(_)) => {}
                Err(e) => {
                    error!(endpoint = label.as_str(), error = %e, "WebSocket error");
                    break;
                }
            }
        }
    };

    if let Some(shutdown) = shutdown {
        tokio::select! {
            _ = send_task => {}
            _ = recv_task => {}
            _ = shutdown.notified().wait() => {
                debug!(endpoint = endpoint.label(), "Connection closing on shutdown");
            }
        }
    } else {
        tokio::select! {
            _ = send_task => {}
            _ = recv_task => {}
        }
    }

    endpoint.transport_closed().await;
}
