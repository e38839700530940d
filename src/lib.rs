pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::auth::AccessGate;
use crate::services::gatekeeper::TransferGatekeeper;
use crate::services::storage::FileStore;
use axum::{Router, routing::get};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FileStore>,
    pub gate: AccessGate,
    pub gatekeeper: TransferGatekeeper,
}

impl AppState {
    pub fn new(store: Arc<dyn FileStore>, config: &AppConfig) -> Self {
        Self {
            store,
            gate: AccessGate::new(&config.index_token, &config.upload_token),
            gatekeeper: TransferGatekeeper::new(config.block_empty_zip),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::files::index))
        .route("/api/list", get(handlers::files::api_list))
        .route("/dl/:filename", get(handlers::files::download))
        .route(
            "/upload",
            get(handlers::files::upload_form).post(handlers::files::upload),
        )
        .route("/healthz", get(handlers::health::healthz))
        .with_state(state)
}
