//! Application state and composition.

use std::sync::Arc;

use crate::api::rooms::RoomManager;
use crate::entities::ZoneRegistry;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    content::ContentCatalog,
    ports::{ClockPort, PlayerStore, RandomPort},
    settings::EngineSettings,
};
use crate::room::{default_player_factory, PlayerFactory, RoomDeps};

/// Main application state.
///
/// Owns the room manager and the shared static content. Passed to HTTP and
/// WebSocket handlers via Axum state.
pub struct App {
    pub settings: EngineSettings,
    pub content: Arc<ContentCatalog>,
    pub rooms: Arc<RoomManager>,
}

impl App {
    /// Wires production adapters and starts one room per zone. Must be called
    /// from within a tokio runtime.
    pub fn new(
        settings: EngineSettings,
        content: ContentCatalog,
        store: Arc<dyn PlayerStore>,
    ) -> Self {
        Self::with_ports(
            settings,
            content,
            store,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            default_player_factory(),
        )
    }

    pub fn with_ports(
        settings: EngineSettings,
        content: ContentCatalog,
        store: Arc<dyn PlayerStore>,
        clock: Arc<dyn ClockPort>,
        rng: Arc<dyn RandomPort>,
        factory: PlayerFactory,
    ) -> Self {
        let content = Arc::new(content);
        let deps = RoomDeps {
            zones: Arc::new(ZoneRegistry::new(content.zones().to_vec())),
            content: Arc::clone(&content),
            clock,
            rng,
            factory,
        };
        let rooms = Arc::new(RoomManager::start(deps, &settings, store));
        Self {
            settings,
            content,
            rooms,
        }
    }
}
