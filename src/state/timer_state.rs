//! Timer state structure and the stopwatch timing engine

use serde::{Deserialize, Serialize};

/// Stopwatch state - the single persisted entity
///
/// All times are milliseconds. `start_moment_ms` is a reading of the
/// process-local monotonic clock and is only meaningful while `running`;
/// the clock epoch resets on every process start, so a reloaded running
/// state must be reconciled before use (see `storage::StateSlot`).
///
/// The JSON field names stay camelCase so a slot written by earlier
/// versions of the widget remains readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Whether the clock is actively accumulating
    #[serde(default)]
    pub running: bool,
    /// Accumulated total while paused; authoritative baseline when not running
    #[serde(default, rename = "elapsed")]
    pub elapsed_ms: u64,
    /// Monotonic reading at the most recent start/resume
    #[serde(default, rename = "startMoment")]
    pub start_moment_ms: u64,
    /// Cumulative elapsed time at each lap, chronological, non-decreasing
    #[serde(default)]
    pub laps: Vec<u64>,
}

/// Indices of the fastest and slowest lap splits
///
/// `None` when fewer than two laps have been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitExtremes {
    pub best: Option<usize>,
    pub worst: Option<usize>,
}

impl TimerState {
    /// Create a fresh zeroed state: paused, no elapsed time, no laps
    pub fn new() -> Self {
        Self {
            running: false,
            elapsed_ms: 0,
            start_moment_ms: 0,
            laps: Vec::new(),
        }
    }

    /// Start or resume the stopwatch; no-op if already running
    pub fn start(&mut self, now_ms: u64) {
        if self.running {
            return;
        }
        self.start_moment_ms = now_ms;
        self.running = true;
    }

    /// Pause the stopwatch, folding the current segment into `elapsed_ms`;
    /// no-op if not running
    pub fn pause(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        self.elapsed_ms += now_ms.saturating_sub(self.start_moment_ms);
        self.running = false;
    }

    /// Zero the elapsed time, pausing first if running. Laps are kept;
    /// use `clear_laps` to discard them.
    pub fn reset(&mut self, now_ms: u64) {
        if self.running {
            self.pause(now_ms);
        }
        self.elapsed_ms = 0;
        self.start_moment_ms = 0;
    }

    /// Record a lap at the current cumulative elapsed time; no-op if not
    /// running, which keeps the lap list non-decreasing
    pub fn lap(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        let elapsed = self.current_elapsed(now_ms);
        self.laps.push(elapsed);
    }

    /// Discard all recorded laps; running/elapsed state is untouched
    pub fn clear_laps(&mut self) {
        self.laps.clear();
    }

    /// Current elapsed time: `elapsed_ms` while paused, otherwise
    /// `elapsed_ms` plus the in-flight segment. Pure query, no mutation.
    pub fn current_elapsed(&self, now_ms: u64) -> u64 {
        if self.running {
            self.elapsed_ms + now_ms.saturating_sub(self.start_moment_ms)
        } else {
            self.elapsed_ms
        }
    }

    /// Check if the stopwatch is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Per-lap split durations: successive differences of the cumulative
    /// lap list, the first split being the first cumulative value itself
    pub fn splits(&self) -> Vec<u64> {
        self.laps
            .iter()
            .scan(0u64, |prev, &cum| {
                let split = cum.saturating_sub(*prev);
                *prev = cum;
                Some(split)
            })
            .collect()
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the fastest and slowest splits in a cumulative lap list.
///
/// Needs at least two laps to be meaningful; below that both indices are
/// `None`. Ties go to the earliest lap (strict comparisons against the
/// running extremes).
pub fn best_worst_split(laps: &[u64]) -> SplitExtremes {
    if laps.len() < 2 {
        return SplitExtremes {
            best: None,
            worst: None,
        };
    }

    let mut best = 0usize;
    let mut worst = 0usize;
    let mut best_ms = laps[0];
    let mut worst_ms = laps[0];
    let mut prev = laps[0];

    for (i, &cum) in laps.iter().enumerate().skip(1) {
        let split = cum.saturating_sub(prev);
        prev = cum;
        if split < best_ms {
            best_ms = split;
            best = i;
        }
        if split > worst_ms {
            worst_ms = split;
            worst = i;
        }
    }

    SplitExtremes {
        best: Some(best),
        worst: Some(worst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_zeroed_and_paused() {
        let state = TimerState::new();
        assert!(!state.running);
        assert_eq!(state.current_elapsed(9999), 0);
        assert!(state.laps.is_empty());
    }

    #[test]
    fn start_pause_accumulates_interval_sums() {
        let mut state = TimerState::new();

        state.start(1000);
        assert!(state.running);
        assert_eq!(state.current_elapsed(1500), 500);
        assert_eq!(state.current_elapsed(2000), 1000);

        state.pause(2000);
        assert!(!state.running);
        // Stable while paused, regardless of how late we query
        assert_eq!(state.current_elapsed(5000), 1000);

        state.start(5000);
        state.pause(5250);
        state.start(6000);
        state.pause(6750);
        // 1000 + 250 + 750
        assert_eq!(state.current_elapsed(9999), 2000);
    }

    #[test]
    fn redundant_start_and_pause_are_no_ops() {
        let mut state = TimerState::new();

        state.pause(100);
        assert_eq!(state, TimerState::new());

        state.start(1000);
        // A second start must not move the segment baseline
        state.start(2000);
        assert_eq!(state.current_elapsed(3000), 2000);

        state.pause(3000);
        state.pause(4000);
        assert_eq!(state.current_elapsed(4000), 2000);
    }

    #[test]
    fn reset_zeroes_elapsed_from_any_state() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(400);
        state.reset(1000);
        assert!(!state.running);
        assert_eq!(state.current_elapsed(2000), 0);
        // Laps survive reset
        assert_eq!(state.laps, vec![400]);

        // Reset while already paused is still a valid transition
        state.elapsed_ms = 777;
        state.reset(3000);
        assert_eq!(state.current_elapsed(3000), 0);
        assert!(!state.running);
    }

    #[test]
    fn lap_while_paused_is_a_no_op() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(500);
        state.pause(1000);
        state.lap(2000);
        assert_eq!(state.laps, vec![500]);
    }

    #[test]
    fn laps_are_cumulative_and_non_decreasing() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(1500);
        state.lap(2700);
        state.pause(3000);
        state.start(4000);
        state.lap(4100);
        assert_eq!(state.laps, vec![1500, 2700, 3100]);
        for pair in state.laps.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn clear_laps_keeps_running_state() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(100);
        state.lap(200);
        state.clear_laps();
        assert!(state.laps.is_empty());
        assert!(state.running);
        assert_eq!(state.current_elapsed(500), 500);
    }

    #[test]
    fn splits_are_successive_differences() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(1500);
        state.lap(2700);
        state.lap(6000);
        assert_eq!(state.splits(), vec![1500, 1200, 3300]);
    }

    #[test]
    fn best_worst_needs_two_laps() {
        assert_eq!(
            best_worst_split(&[]),
            SplitExtremes {
                best: None,
                worst: None
            }
        );
        assert_eq!(
            best_worst_split(&[1500]),
            SplitExtremes {
                best: None,
                worst: None
            }
        );
    }

    #[test]
    fn best_worst_picks_extreme_splits() {
        // Splits: 1500, 1200, 3300
        let extremes = best_worst_split(&[1500, 2700, 6000]);
        assert_eq!(extremes.best, Some(1));
        assert_eq!(extremes.worst, Some(2));
    }

    #[test]
    fn best_worst_ties_go_to_earliest_lap() {
        // Splits: 1000, 1000, 1000
        let extremes = best_worst_split(&[1000, 2000, 3000]);
        assert_eq!(extremes.best, Some(0));
        assert_eq!(extremes.worst, Some(0));
    }

    #[test]
    fn full_session_walkthrough() {
        let mut state = TimerState::new();
        state.start(0);
        state.lap(1500);
        assert_eq!(state.laps, vec![1500]);
        state.lap(2700);
        assert_eq!(state.laps, vec![1500, 2700]);
        state.pause(3000);
        assert_eq!(state.current_elapsed(3000), 3000);
        assert!(!state.running);
        state.reset(3000);
        assert_eq!(state.current_elapsed(3000), 0);
        assert_eq!(state.laps, vec![1500, 2700]);
        state.clear_laps();
        assert!(state.laps.is_empty());
    }

    #[test]
    fn serde_round_trip_is_field_for_field() {
        let state = TimerState {
            running: true,
            elapsed_ms: 5000,
            start_moment_ms: 1000,
            laps: vec![1500, 2700],
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: TimerState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn serde_uses_original_widget_field_names() {
        let state = TimerState {
            running: false,
            elapsed_ms: 42,
            start_moment_ms: 7,
            laps: vec![],
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["elapsed"], 42);
        assert_eq!(value["startMoment"], 7);
        assert_eq!(value["running"], false);
    }

    #[test]
    fn serde_tolerates_missing_and_unknown_fields() {
        let state: TimerState =
            serde_json::from_str(r#"{"elapsed": 250, "badge": "live"}"#).unwrap();
        assert_eq!(state.elapsed_ms, 250);
        assert!(!state.running);
        assert_eq!(state.start_moment_ms, 0);
        assert!(state.laps.is_empty());
    }
}
