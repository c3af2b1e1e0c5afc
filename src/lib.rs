//! # chat-relay
//!
//! Single-endpoint HTTP relay in front of a local Ollama server.
//!
//! `POST /api/chat` takes `{prompt, model?, history?}`, flattens the
//! conversation into one prompt string, calls the streaming generate API and
//! re-emits each text fragment as a server-sent event `data: {"text": ...}`.

pub mod backend;
pub mod config;
pub mod error;
pub mod handler;
pub mod prompt;
pub mod types;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use backend::GenerateClient;
pub use config::RelayConfig;
pub use error::RelayError;


#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub backend: GenerateClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let backend = GenerateClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }
}


/// Builds the routable relay app. Requests from any origin are allowed.
pub fn create_app(config: RelayConfig) -> Result<Router, RelayError> {
    let state = AppState::new(config)?;

    Ok(handler::routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
