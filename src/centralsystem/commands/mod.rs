//! Typed central-system → station commands
//!
//! Each command extends [`StationHandle`](super::session::StationHandle)
//! with a typed wrapper: serialize the `rust-ocpp` request, validate it
//! against the outbound schema, send the Call and deserialize the typed
//! response. Wrappers are per negotiated OCPP version; calling a wrapper
//! of the wrong version fails locally without touching the wire.

pub mod v16;
pub mod v201;
