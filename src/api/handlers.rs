//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use crate::state::{AppState, DisplayFrame};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start or resume the stopwatch
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok((timer, changed)) => {
            let frame = DisplayFrame::from_state(&timer, state.now_ms());
            if changed {
                info!("Start endpoint called - stopwatch running");
                Ok(Json(ApiResponse::changed(
                    "Stopwatch started".to_string(),
                    frame,
                )))
            } else {
                Ok(Json(ApiResponse::unchanged(
                    "Stopwatch already running".to_string(),
                    frame,
                )))
            }
        }
        Err(e) => {
            error!("Failed to start stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the stopwatch
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok((timer, changed)) => {
            let frame = DisplayFrame::from_state(&timer, state.now_ms());
            if changed {
                info!("Pause endpoint called - stopwatch paused at {}", frame.display);
                Ok(Json(ApiResponse::changed(
                    "Stopwatch paused".to_string(),
                    frame,
                )))
            } else {
                Ok(Json(ApiResponse::unchanged(
                    "Stopwatch already paused".to_string(),
                    frame,
                )))
            }
        }
        Err(e) => {
            error!("Failed to pause stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Zero the elapsed time (laps are kept)
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok((timer, changed)) => {
            let frame = DisplayFrame::from_state(&timer, state.now_ms());
            if changed {
                info!("Reset endpoint called - elapsed time zeroed");
                Ok(Json(ApiResponse::changed(
                    "Stopwatch reset".to_string(),
                    frame,
                )))
            } else {
                Ok(Json(ApiResponse::unchanged(
                    "Stopwatch already at zero".to_string(),
                    frame,
                )))
            }
        }
        Err(e) => {
            error!("Failed to reset stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /lap - Record a lap at the current elapsed time
pub async fn lap_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.lap() {
        Ok((timer, changed)) => {
            let frame = DisplayFrame::from_state(&timer, state.now_ms());
            if changed {
                info!(
                    "Lap endpoint called - lap {} recorded at {}",
                    timer.laps.len(),
                    frame.display
                );
                Ok(Json(ApiResponse::changed(
                    format!("Lap {} recorded", timer.laps.len()),
                    frame,
                )))
            } else {
                Ok(Json(ApiResponse::unchanged(
                    "Stopwatch is paused, lap not recorded".to_string(),
                    frame,
                )))
            }
        }
        Err(e) => {
            error!("Failed to record lap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /clear-laps - Discard all recorded laps
pub async fn clear_laps_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.clear_laps() {
        Ok((timer, changed)) => {
            let frame = DisplayFrame::from_state(&timer, state.now_ms());
            if changed {
                info!("Clear-laps endpoint called - lap list emptied");
                Ok(Json(ApiResponse::changed(
                    "Laps cleared".to_string(),
                    frame,
                )))
            } else {
                Ok(Json(ApiResponse::unchanged(
                    "No laps to clear".to_string(),
                    frame,
                )))
            }
        }
        Err(e) => {
            error!("Failed to clear laps: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Full stopwatch and server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    match state.get_timer_state() {
        Ok(timer) => {
            let mut status = StatusResponse::from_state(&timer, state.now_ms());
            let (last_action, last_action_time) = state.get_last_action();
            status.uptime = state.get_uptime();
            status.state_file = state.slot.path().display().to_string();
            status.last_action = last_action;
            status.last_action_time = last_action_time;
            Ok(Json(status))
        }
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
