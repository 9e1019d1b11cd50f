/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, background tasks and route
 * configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to the database and run migrations
 * 2. Build the shared `AppState`
 * 3. Start the periodic background tasks
 * 4. Create and configure the router
 *
 * # Background Tasks
 *
 * - Broadcast channel cleanup: drops room channels with no receivers left
 * - Typing sweeper: clears typing flags whose deadline passed and tells the
 *   room the user stopped typing
 */

use std::time::{Duration, Instant};

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Shortest interval between two typing sweeps
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Connect to the database and build the application state
///
/// No background task is started.
pub async fn create_state(config: ServerConfig) -> Result<AppState, BackendError> {
    let db = load_database(&config.database_url).await?;
    Ok(AppState::new(db, config))
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated.
pub async fn create_app(config: ServerConfig) -> Result<Router, BackendError> {
    tracing::info!("Initializing WanderHub messaging server");

    let state = create_state(config).await?;
    spawn_background_tasks(&state);

    let app = create_router(state);
    tracing::info!("Router configured with periodic cleanup tasks");
    Ok(app)
}

/// Start the broadcast channel cleanup and the typing sweeper
pub fn spawn_background_tasks(state: &AppState) {
    let rooms = state.rooms.clone();
    let cleanup_every = state.config.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            let removed = rooms.cleanup_inactive_channels();
            tracing::debug!("[Realtime] Cleaned up {} inactive room channels", removed);
        }
    });

    let typing = state.typing.clone();
    let rooms = state.rooms.clone();
    let sweep_every = (typing.ttl() / 2).max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            for flag in typing.expire(Instant::now()) {
                if let Some(event) = flag.stop_event() {
                    tracing::debug!("[Realtime] Typing flag of {} expired in {:?}", flag.username, flag.room);
                    broadcast_event(&rooms, flag.room, None, event);
                }
            }
        }
    });
}
