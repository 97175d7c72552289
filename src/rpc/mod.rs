//! RPC transport layer — OCPP-J framing and the symmetric endpoint

pub mod endpoint;
pub mod error;
pub mod frame;

pub use endpoint::{RpcEndpoint, RpcListener, RpcSpy, SpyHandle};
pub use error::{CallFailure, RpcErrorCode, RpcProblem};
pub use frame::{FrameError, RpcFrame};
