//! Durable state storage module
//!
//! This module persists the stopwatch state to a single local slot and
//! reconciles a reloaded running state against the new process clock.

pub mod slot;

// Re-export main types
pub use slot::StateSlot;
