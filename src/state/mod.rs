//! State management module
//!
//! This module contains the stopwatch timing engine and the shared
//! application state built around it.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, DisplayFrame};
pub use timer_state::{best_worst_split, SplitExtremes, TimerState};
