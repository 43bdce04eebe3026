//! TradePro - simulation core and server for a mock trading terminal

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod websocket;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::{AccountService, OrderDesk, Terminal};
use websocket::RoomManager;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub terminal: Arc<Terminal>,
    pub orders: Arc<OrderDesk>,
    pub account: Arc<AccountService>,
    pub room_manager: Arc<RoomManager>,
}

impl AppState {
    /// Build fresh state. The simulation loops are not started.
    pub fn new(config: Config) -> Self {
        let terminal = Terminal::new(config.simulation.clone());
        Self {
            orders: OrderDesk::new(terminal.clone()),
            account: Arc::new(AccountService::new(config.login_delay)),
            room_manager: RoomManager::new(),
            config: Arc::new(config),
            terminal,
        }
    }
}

/// Full HTTP + WebSocket router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .route("/ws", get(websocket::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
