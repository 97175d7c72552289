//! Typed station-initiated requests
//!
//! One file per operation group, each extending [`ChargePoint`] with the
//! typed wrappers the embedder calls. Wrappers that may legally run while
//! disconnected go through the offline queue; real-time operations fail
//! with `NotConnected` instead.

mod authorize;
mod data_transfer;
mod iso15118;
mod metering;
mod notifications;
mod security;
mod transactions;
