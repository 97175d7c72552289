//! Scheduling fabric — timers and bounded worker concurrency

pub mod timer_pool;
pub mod worker_pool;

pub use timer_pool::{Timer, TimerPool};
pub use worker_pool::WorkerPool;
