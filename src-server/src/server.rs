//! Axum application
//!
//! Merges the browser router with the node catalog, browser settings and a
//! health check, then serves it on the configured address.
//!
//! The node catalog lists every registered node type, optionally filtered
//! with `?category=input|control`; `/nhk/nodes/{node_type}` returns one.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use node_engine::{NodeCategory, NodeRegistry, TaskMetadata};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::constants::endpoints;

/// Settings a browser front-end needs to talk to this server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSettings {
    pub images_endpoint: String,
    pub view_endpoint: String,
    pub min_height: f64,
}

#[derive(Clone)]
struct CatalogState {
    registry: Arc<NodeRegistry>,
    settings: Arc<BrowserSettings>,
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    category: Option<NodeCategory>,
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Build the full application router
pub fn build_app(config: &ServerConfig) -> Router {
    let registry = workflow_nodes::builtin_registry();
    log::info!("Registered {} node types", registry.len());

    let state = CatalogState {
        registry: Arc::new(registry),
        settings: Arc::new(BrowserSettings {
            images_endpoint: config.images_endpoint.clone(),
            view_endpoint: config.view_endpoint.clone(),
            min_height: config.min_browser_height,
        }),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route(endpoints::HEALTH, get(health_handler))
        .route(endpoints::NODES, get(nodes_handler))
        .route(&format!("{}/:node_type", endpoints::NODES), get(node_handler))
        .route(endpoints::BROWSER_SETTINGS, get(settings_handler))
        .with_state(state);

    image_browser_http::router(config.folder_policy(), &config.endpoints())
        .merge(catalog)
        .layer(cors)
}

/// Bind the configured address and serve until the process exits
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let app = build_app(&config);
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    log::info!("Image browser server listening on http://{}", addr);
    let policy = config.folder_policy();
    if policy.is_restricted() {
        log::info!("Browsing restricted to {:?}", policy.allowed_roots());
    } else {
        log::warn!("No allowed_roots configured; any folder can be browsed");
    }

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}

// --- Axum Handlers ---

async fn health_handler() -> &'static str {
    "ok"
}

async fn nodes_handler(
    State(state): State<CatalogState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<TaskMetadata>> {
    let nodes = match query.category {
        Some(category) => state.registry.by_category(category),
        None => state.registry.all_metadata(),
    };
    Json(nodes.into_iter().cloned().collect())
}

async fn node_handler(
    State(state): State<CatalogState>,
    Path(node_type): Path<String>,
) -> Result<Json<TaskMetadata>, StatusCode> {
    state
        .registry
        .get_metadata(&node_type)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn settings_handler(State(state): State<CatalogState>) -> Json<BrowserSettings> {
    Json(state.settings.as_ref().clone())
}
