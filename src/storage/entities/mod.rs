//! SeaORM entities for the stack-internal tables

pub mod internal_config;
pub mod request_fifo;
