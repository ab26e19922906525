//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    storage::StateSlot,
    utils::format::{format_elapsed, format_uptime},
};

use super::TimerState;

/// One rendered snapshot of the stopwatch display
///
/// Published over a watch channel by the render tick task while the
/// stopwatch runs, and on every command; `/status` serves the latest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub elapsed_ms: u64,
    pub display: String,
    pub running: bool,
}

impl DisplayFrame {
    /// Render a frame from the timer state at the given clock reading
    pub fn from_state(state: &TimerState, now_ms: u64) -> Self {
        let elapsed_ms = state.current_elapsed(now_ms);
        Self {
            elapsed_ms,
            display: format_elapsed(elapsed_ms),
            running: state.running,
        }
    }
}

/// Main application state: the timer, its persistence slot, the process
/// clock anchor, and the notification channels
#[derive(Debug)]
pub struct AppState {
    /// The stopwatch state, mutated only through the command methods below
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Durable slot written after every mutation and on shutdown
    pub slot: StateSlot,
    /// Monotonic clock anchor; `now_ms` is measured from here
    pub start_time: Instant,
    /// Server metadata
    pub port: u16,
    pub host: String,
    /// Render tick rate for the display loop
    pub tick_rate_hz: u64,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer state change notifications (drives the render task)
    pub state_change_tx: watch::Sender<TimerState>,
    /// Channel for rendered display frames
    pub display_tx: watch::Sender<DisplayFrame>,
    /// Keep the receivers alive to prevent channel closure
    _state_change_rx: watch::Receiver<TimerState>,
    _display_rx: watch::Receiver<DisplayFrame>,
}

impl AppState {
    /// Create a new AppState around an already loaded and reconciled
    /// timer state
    pub fn new(
        initial: TimerState,
        slot: StateSlot,
        host: String,
        port: u16,
        tick_rate_hz: u64,
    ) -> Self {
        let start_time = Instant::now();
        let initial_frame = DisplayFrame::from_state(&initial, 0);
        let (state_change_tx, state_change_rx) = watch::channel(initial.clone());
        let (display_tx, display_rx) = watch::channel(initial_frame);

        Self {
            timer_state: Arc::new(Mutex::new(initial)),
            slot,
            start_time,
            port,
            host,
            tick_rate_hz,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            state_change_tx,
            display_tx,
            _state_change_rx: state_change_rx,
            _display_rx: display_rx,
        }
    }

    /// Milliseconds on the process-local monotonic clock
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Apply a timer mutation and run the shared bookkeeping: persist the
    /// new state, record the action, and notify the render task.
    ///
    /// Returns the new state and whether anything actually changed; guarded
    /// no-ops (start while running, lap while paused) skip the bookkeeping.
    fn update_timer<F>(&self, action: &str, updater: F) -> Result<(TimerState, bool), String>
    where
        F: FnOnce(&mut TimerState, u64),
    {
        let now_ms = self.now_ms();

        // Lock the timer state and apply the update
        let mut state = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let before = state.clone();
        updater(&mut state, now_ms);
        let new_state = state.clone();

        if new_state == before {
            return Ok((new_state, false));
        }

        // The lock stays held through the save and the notifications below,
        // so a concurrent command cannot interleave an older state into the
        // slot or the channels.

        // Persist after every mutating operation
        if let Err(e) = self.slot.save(&new_state) {
            warn!("Failed to persist timer state: {}", e);
        }

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Notify the render task and refresh the display frame
        if let Err(e) = self.state_change_tx.send(new_state.clone()) {
            warn!("Failed to send timer state notification: {}", e);
        }
        if let Err(e) = self
            .display_tx
            .send(DisplayFrame::from_state(&new_state, now_ms))
        {
            warn!("Failed to send display frame: {}", e);
        }
        drop(state);

        Ok((new_state, true))
    }

    /// Start or resume the stopwatch
    pub fn start(&self) -> Result<(TimerState, bool), String> {
        info!("Starting stopwatch");
        self.update_timer("start", |state, now| state.start(now))
    }

    /// Pause the stopwatch
    pub fn pause(&self) -> Result<(TimerState, bool), String> {
        info!("Pausing stopwatch");
        self.update_timer("pause", |state, now| state.pause(now))
    }

    /// Reset elapsed time to zero (laps are kept)
    pub fn reset(&self) -> Result<(TimerState, bool), String> {
        info!("Resetting stopwatch");
        self.update_timer("reset", |state, now| state.reset(now))
    }

    /// Record a lap at the current elapsed time
    pub fn lap(&self) -> Result<(TimerState, bool), String> {
        info!("Recording lap");
        self.update_timer("lap", |state, now| state.lap(now))
    }

    /// Discard all recorded laps
    pub fn clear_laps(&self) -> Result<(TimerState, bool), String> {
        info!("Clearing laps");
        self.update_timer("clear-laps", |state, _now| state.clear_laps())
    }

    /// Get a snapshot of the current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.timer_state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Current elapsed time on the live clock
    pub fn current_elapsed(&self) -> Result<u64, String> {
        let now_ms = self.now_ms();
        self.timer_state
            .lock()
            .map(|state| state.current_elapsed(now_ms))
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Subscribe to timer state change notifications
    pub fn subscribe_state(&self) -> watch::Receiver<TimerState> {
        self.state_change_tx.subscribe()
    }

    /// Latest rendered display frame
    pub fn latest_frame(&self) -> DisplayFrame {
        self.display_tx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(name: &str) -> AppState {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "lapwatch-app-test-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        AppState::new(
            TimerState::default(),
            StateSlot::new(path),
            "127.0.0.1".to_string(),
            0,
            60,
        )
    }

    #[test]
    fn commands_report_whether_state_changed() {
        let app = test_state("changed-flag");

        let (state, changed) = app.start().unwrap();
        assert!(changed);
        assert!(state.running);

        // Guarded no-op: starting twice
        let (_, changed) = app.start().unwrap();
        assert!(!changed);

        // Lap while running mutates, lap after pause does not
        let (_, changed) = app.lap().unwrap();
        assert!(changed);
        let (_, changed) = app.pause().unwrap();
        assert!(changed);
        let (state, changed) = app.lap().unwrap();
        assert!(!changed);
        assert_eq!(state.laps.len(), 1);

        let _ = std::fs::remove_file(app.slot.path());
    }

    #[test]
    fn mutations_are_persisted_to_the_slot() {
        let app = test_state("persists");
        app.start().unwrap();
        let (paused, _) = app.pause().unwrap();

        let reloaded = app.slot.load();
        assert_eq!(reloaded, paused);
        let _ = std::fs::remove_file(app.slot.path());
    }

    #[test]
    fn slot_and_channels_match_engine_after_concurrent_commands() {
        let app = Arc::new(test_state("concurrent"));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let app = Arc::clone(&app);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    let _ = app.start();
                    let _ = app.lap();
                    let _ = app.pause();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // The durable slot and the watch channel must both hold the final
        // engine state, never one a concurrent command overwrote late
        let engine = app.get_timer_state().unwrap();
        assert_eq!(app.slot.load(), engine);
        assert_eq!(app.subscribe_state().borrow().clone(), engine);
        let _ = std::fs::remove_file(app.slot.path());
    }

    #[test]
    fn state_changes_reach_subscribers() {
        let app = test_state("notify");
        let rx = app.subscribe_state();

        app.start().unwrap();
        assert!(rx.borrow().running);

        app.pause().unwrap();
        assert!(!rx.borrow().running);
        let _ = std::fs::remove_file(app.slot.path());
    }

    #[test]
    fn display_frame_tracks_commands() {
        let app = test_state("frame");
        app.start().unwrap();
        app.pause().unwrap();

        let frame = app.latest_frame();
        assert!(!frame.running);
        assert_eq!(frame.elapsed_ms, app.current_elapsed().unwrap());
        let _ = std::fs::remove_file(app.slot.path());
    }
}
