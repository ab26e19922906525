//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{best_worst_split, DisplayFrame, TimerState};
use crate::utils::format::format_elapsed;

/// API response structure for the stopwatch command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub frame: DisplayFrame,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, frame: DisplayFrame) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            frame,
        }
    }

    /// Create a response for a command that mutated the timer
    pub fn changed(message: String, frame: DisplayFrame) -> Self {
        Self::new("changed".to_string(), message, frame)
    }

    /// Create a response for a guarded no-op command
    pub fn unchanged(message: String, frame: DisplayFrame) -> Self {
        Self::new("unchanged".to_string(), message, frame)
    }
}

/// One lap row: cumulative total plus the split it closed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapEntry {
    pub index: usize,
    pub cumulative_ms: u64,
    pub cumulative: String,
    pub split_ms: u64,
    pub split: String,
}

/// Full status response with timer, laps, and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub elapsed_ms: u64,
    pub display: String,
    pub laps: Vec<LapEntry>,
    pub best_split: Option<usize>,
    pub worst_split: Option<usize>,
    pub uptime: String,
    pub state_file: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl StatusResponse {
    /// Build a status document from a timer snapshot at the given clock
    /// reading
    pub fn from_state(state: &TimerState, now_ms: u64) -> Self {
        let elapsed_ms = state.current_elapsed(now_ms);
        let splits = state.splits();
        let laps = state
            .laps
            .iter()
            .zip(splits.iter())
            .enumerate()
            .map(|(index, (&cumulative_ms, &split_ms))| LapEntry {
                index,
                cumulative_ms,
                cumulative: format_elapsed(cumulative_ms),
                split_ms,
                split: format_elapsed(split_ms),
            })
            .collect();
        let extremes = best_worst_split(&state.laps);

        Self {
            running: state.running,
            elapsed_ms,
            display: format_elapsed(elapsed_ms),
            laps,
            best_split: extremes.best,
            worst_split: extremes.worst,
            uptime: String::new(),
            state_file: String::new(),
            last_action: None,
            last_action_time: None,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rows_pair_cumulative_and_split() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(1500);
        state.lap(2700);
        state.pause(3000);

        let status = StatusResponse::from_state(&state, 3000);
        assert_eq!(status.elapsed_ms, 3000);
        assert_eq!(status.display, "00:00:03.00");
        assert_eq!(status.laps.len(), 2);
        assert_eq!(status.laps[0].cumulative_ms, 1500);
        assert_eq!(status.laps[0].split_ms, 1500);
        assert_eq!(status.laps[1].cumulative_ms, 2700);
        assert_eq!(status.laps[1].split_ms, 1200);
        assert_eq!(status.best_split, Some(1));
        assert_eq!(status.worst_split, Some(0));
    }

    #[test]
    fn status_with_one_lap_has_no_extremes() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(900);

        let status = StatusResponse::from_state(&state, 1000);
        assert_eq!(status.best_split, None);
        assert_eq!(status.worst_split, None);
    }
}
