//! Utility helpers: display formatting and signal handling

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_elapsed, format_uptime};
pub use signals::shutdown_signal;
