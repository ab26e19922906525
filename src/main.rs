//! Lapwatch - A state-managed HTTP stopwatch with lap splits
//!
//! This is the main entry point for the lapwatch application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use lapwatch::{
    api::create_router,
    config::Config,
    state::AppState,
    storage::StateSlot,
    tasks::render_tick_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("lapwatch={},tower_http=info", config.log_level()))
        .init();

    info!("Starting lapwatch v0.1.0");
    info!(
        "Configuration: host={}, port={}, state_file={}, tick_rate={}fps",
        config.host, config.port, config.state_file, config.tick_rate
    );

    // Load the persisted state and reconcile it against this process's
    // clock. The AppState anchor is created right after, so a zero reading
    // here is the same epoch.
    let slot = StateSlot::new(&config.state_file);
    let initial = slot.load_on_startup(0);
    if initial.running {
        info!(
            "Resuming running stopwatch at {}ms elapsed",
            initial.elapsed_ms
        );
    }

    // Create application state
    let state = Arc::new(AppState::new(
        initial,
        slot,
        config.host.clone(),
        config.port,
        config.tick_rate,
    ));

    // Start the render tick background task
    let render_state = Arc::clone(&state);
    tokio::spawn(async move {
        render_tick_task(render_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Start or resume the stopwatch");
    info!("  POST /pause      - Pause the stopwatch");
    info!("  POST /reset      - Zero the elapsed time (laps kept)");
    info!("  POST /lap        - Record a lap split");
    info!("  POST /clear-laps - Discard all laps");
    info!("  GET  /status     - Current elapsed time, laps, and splits");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Final save so the most recent state survives teardown
    match state.get_timer_state() {
        Ok(timer) => {
            if let Err(e) = state.slot.save(&timer) {
                tracing::error!("Failed to save state on shutdown: {}", e);
            }
        }
        Err(e) => tracing::error!("Failed to read state on shutdown: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
