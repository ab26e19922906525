//! Single-slot JSON persistence for the stopwatch state

use std::{fs, path::PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::state::TimerState;

/// A single durable slot holding the serialized stopwatch state
///
/// One JSON document at a fixed path, overwritten on every save. Loading
/// fails soft: an absent or malformed slot yields a zeroed default state,
/// never an error.
#[derive(Debug, Clone)]
pub struct StateSlot {
    path: PathBuf,
}

impl StateSlot {
    /// Create a slot backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Serialize the full state into the slot, overwriting any prior value.
    ///
    /// Writes to a sibling temp file first and renames it into place, so an
    /// interrupted save never leaves a half-written document behind.
    pub fn save(&self, state: &TimerState) -> anyhow::Result<()> {
        let json = serde_json::to_string(state).context("Failed to serialize timer state")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create state directory {:?}", parent))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write state to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move state into {:?}", self.path))?;

        debug!("Saved timer state to {:?}", self.path);
        Ok(())
    }

    /// Deserialize the slot, falling back to a zeroed default state if the
    /// file is absent or the document is malformed
    pub fn load(&self) -> TimerState {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!("No persisted state at {:?} ({}), starting fresh", self.path, e);
                return TimerState::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Malformed state document at {:?} ({}), starting fresh",
                    self.path, e
                );
                TimerState::default()
            }
        }
    }

    /// Reconcile a loaded state against the current process clock.
    ///
    /// The monotonic clock epoch resets on every process start, so a
    /// persisted `start_moment_ms` from the previous process is stale. For
    /// a running state we re-anchor the segment at `now_ms` and keep the
    /// persisted `elapsed_ms`: the stopwatch resumes exactly where it left
    /// off, counting the unloaded gap as zero.
    pub fn reconcile_on_startup(&self, mut state: TimerState, now_ms: u64) -> TimerState {
        if state.running {
            debug!(
                "Resuming running stopwatch at {}ms elapsed",
                state.elapsed_ms
            );
            state.start_moment_ms = now_ms;
        }
        state
    }

    /// Load and reconcile in one step, for process startup
    pub fn load_on_startup(&self, now_ms: u64) -> TimerState {
        let state = self.load();
        self.reconcile_on_startup(state, now_ms)
    }
}
