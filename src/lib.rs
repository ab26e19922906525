//! Lapwatch - A state-managed HTTP stopwatch with lap splits
//!
//! This library provides a stopwatch timing engine driven by a monotonic
//! clock, a durable single-slot persistence gateway that survives process
//! restarts, and an HTTP surface binding each stopwatch command to an
//! endpoint.

pub mod api;
pub mod config;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, TimerState};
pub use storage::StateSlot;
pub use utils::signals::shutdown_signal;
