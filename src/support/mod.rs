//! Cross-cutting utilities

pub mod errors;
pub mod shutdown;

pub use errors::{OcppError, OcppResult};
pub use shutdown::ShutdownSignal;
