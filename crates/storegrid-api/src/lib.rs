//! storegrid-api — REST API for StoreGrid.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Liveness banner |
//! | POST | `/stores` | Provision a new store |
//! | GET | `/stores` | List stores with live status |
//! | DELETE | `/stores/{store_id}` | Tear down a store |
//! | GET | `/audit` | Lifecycle audit events, arrival order |
//!
//! A permissive CORS layer is mounted for the browser dashboard.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};
use tower_http::cors::CorsLayer;

use storegrid_provision::Orchestrator;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the complete API router.
pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/stores",
            get(handlers::list_stores).post(handlers::create_store),
        )
        .route("/stores/{store_id}", delete(handlers::delete_store))
        .route("/audit", get(handlers::get_audit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
