//! Render tick background task

use std::{sync::Arc, time::Duration};

use tokio::time::interval;
use tracing::{debug, info, trace};

use crate::state::{AppState, DisplayFrame};

/// Background task that drives the stopwatch display loop.
///
/// Parks on the state change channel while the stopwatch is paused. While
/// it is running, ticks at the configured frame rate, recomputes the
/// current elapsed time, and publishes a rendered frame over the display
/// channel. Ticking stops as soon as a state change reports the stopwatch
/// paused, so no frames are produced while nothing advances.
pub async fn render_tick_task(state: Arc<AppState>) {
    info!("Starting render tick task at {} Hz", state.tick_rate_hz);

    let mut state_rx = state.subscribe_state();
    // interval panics on a zero period, so rates above 1000 fps clamp to
    // millisecond ticks
    let tick_period = Duration::from_millis((1000 / state.tick_rate_hz.max(1)).max(1));

    loop {
        // Wait until the stopwatch is running
        if !state_rx.borrow_and_update().running {
            if state_rx.changed().await.is_err() {
                debug!("State channel closed, stopping render tick task");
                return;
            }
            continue;
        }

        debug!("Stopwatch running, starting display ticks");
        let mut ticker = interval(tick_period);

        loop {
            tokio::select! {
                // Frame tick - recompute elapsed time and publish
                _ = ticker.tick() => {
                    let snapshot = state_rx.borrow().clone();
                    let frame = DisplayFrame::from_state(&snapshot, state.now_ms());
                    trace!("Display frame: {}", frame.display);
                    if state.display_tx.send(frame).is_err() {
                        debug!("Display channel closed, stopping render tick task");
                        return;
                    }
                }

                // State change - stop ticking once paused
                changed = state_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            if !state_rx.borrow_and_update().running {
                                debug!("Stopwatch paused, stopping display ticks");
                                break;
                            }
                        }
                        Err(_) => {
                            debug!("State channel closed, stopping render tick task");
                            return;
                        }
                    }
                }
            }
        }
    }
}
