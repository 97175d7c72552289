//! Typed station-initiated requests (OCPP 2.0.1)
//!
//! Mirror of the 1.6 wrappers: queueable traffic goes through the offline
//! FIFO, real-time operations need a live Accepted session. Wrappers take
//! the `rust-ocpp` request structs directly, like the central-system
//! command wrappers do.

mod authorize;
mod data_transfer;
mod iso15118;
mod metering;
mod notifications;
mod security;
mod transactions;
