pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod map;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use map::MapRenderer;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub renderer: Arc<MapRenderer>,
}

#[cfg(test)]
pub(crate) async fn test_state(maps_dir: &std::path::Path) -> AppState {
    AppState {
        db: db::connect_test().await,
        config: Config::for_tests(maps_dir),
        renderer: Arc::new(MapRenderer::new(map::Basemap::default(), maps_dir)),
    }
}
