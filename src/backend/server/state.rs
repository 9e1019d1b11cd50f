/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool (the only shared mutable resource)
 * - The validated server configuration
 * - The room registry (per-room broadcast channels)
 * - Community viewer counts
 * - Active typing flags
 *
 * # Thread Safety
 *
 * The in-process maps are each behind a `std::sync::Mutex` that is only held
 * for the map update itself, never across an `.await`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::presence::Presence;
use crate::backend::realtime::rooms::RoomRegistry;
use crate::backend::realtime::typing::TypingTracker;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler and WebSocket session
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Validated configuration
    pub config: Arc<ServerConfig>,

    /// Broadcast channels keyed by room
    pub rooms: RoomRegistry,

    /// Which users are viewing which communities
    pub presence: Presence,

    /// Typing flags with deadlines
    pub typing: TypingTracker,
}

impl AppState {
    /// Build state around an already-migrated pool
    ///
    /// Background tasks are started separately by `init::spawn_background_tasks`.
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db,
            rooms: RoomRegistry::new(config.broadcast_capacity),
            presence: Presence::new(),
            typing: TypingTracker::new(config.typing_ttl()),
            config: Arc::new(config),
        }
    }
}

/// Implement FromRef for the database pool
///
/// This allows Axum handlers to extract `State<SqlitePool>` directly.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}
