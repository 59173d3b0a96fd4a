pub mod config;
pub mod dbs;
pub mod error;
pub mod generation;
mod handlers;
pub mod images;
pub mod openai;
pub mod retry;
pub mod service;
pub mod validator;

use crate::handlers::search_character;
use crate::service::CharacterService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CharacterService>,
}

pub fn init(router: Router<AppState>, service: CharacterService) -> Router<()> {
    let state = AppState {
        service: Arc::new(service),
    };

    router
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/character", post(search_character))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
