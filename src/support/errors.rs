//! Stack-level error types

use thiserror::Error;

use crate::rpc::CallFailure;

/// Errors surfaced by the public charge-point / central-system API.
#[derive(Debug, Error)]
pub enum OcppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Schema directory not usable: {0}")]
    SchemaDirectory(String),

    #[error("Not connected to the central system")]
    NotConnected,

    #[error("Operation not allowed in the current registration state")]
    NotAllowed,

    #[error("Request queue is full")]
    QueueFull,

    #[error("Call failed: {0}")]
    Call(#[from] CallFailure),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Stack is not running")]
    NotStarted,

    #[error("Stack is already running")]
    AlreadyStarted,
}

/// Result alias used across the public API.
pub type OcppResult<T> = Result<T, OcppError>;
