//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod render_tick;

// Re-export main functions
pub use render_tick::render_tick_task;
