//! Browser endpoints
//!
//! `POST {images_endpoint}` lists a folder, `GET {view_endpoint}` returns one
//! image. Both paths come from [`EndpointConfig`].

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use image_browser::{scan_folder, serve_image, FolderListing, FolderPolicy, SortMode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::{DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_IMAGES_ENDPOINT, DEFAULT_VIEW_ENDPOINT};

/// Paths and cache policy of the browser endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub images_endpoint: String,
    pub view_endpoint: String,
    pub cache_max_age_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            images_endpoint: DEFAULT_IMAGES_ENDPOINT.to_string(),
            view_endpoint: DEFAULT_VIEW_ENDPOINT.to_string(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
        }
    }
}

/// Body of a folder listing request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImagesRequest {
    pub folder_path: String,
    pub sort_mode: String,
}

/// Query of an image view request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewParams {
    pub folder_path: String,
    pub filename: String,
}

#[derive(Clone)]
struct BrowserApiState {
    policy: Arc<FolderPolicy>,
    view_endpoint: String,
    cache_control: String,
}

/// Build the browser router
pub fn router(policy: FolderPolicy, config: &EndpointConfig) -> Router {
    let state = BrowserApiState {
        policy: Arc::new(policy),
        view_endpoint: config.view_endpoint.clone(),
        cache_control: format!("private, max-age={}", config.cache_max_age_secs),
    };

    Router::new()
        .route(&config.images_endpoint, post(list_images))
        .route(&config.view_endpoint, get(view_image))
        .with_state(state)
}

/// Relative URL under which `filename` is served
fn view_url(view_endpoint: &str, folder_path: &str, filename: &str) -> Option<String> {
    let url = reqwest::Url::parse_with_params(
        &format!("http://localhost{}", view_endpoint),
        &[("folder_path", folder_path), ("filename", filename)],
    )
    .map_err(|e| log::warn!("Invalid view endpoint '{}': {}", view_endpoint, e))
    .ok()?;

    Some(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
}

async fn list_images(
    State(state): State<BrowserApiState>,
    payload: Result<Json<ListImagesRequest>, JsonRejection>,
) -> Result<Json<FolderListing>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let sort_mode: SortMode = request
        .sort_mode
        .parse()
        .map_err(|e: image_browser::BrowserError| ApiError::BadRequest(e.to_string()))?;

    let images = scan_folder(&state.policy, &request.folder_path, sort_mode).await;
    log::debug!(
        "Listed {} images in '{}' ({})",
        images.len(),
        request.folder_path,
        sort_mode
    );

    let listing = FolderListing::from_scan(&images, |image| {
        view_url(&state.view_endpoint, &request.folder_path, &image.filename).unwrap_or_default()
    });
    Ok(Json(listing))
}

async fn view_image(
    State(state): State<BrowserApiState>,
    params: Result<Query<ViewParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::NotFound)?;
    let image = serve_image(&state.policy, &params.folder_path, &params.filename).await?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, state.cache_control),
        ],
        image.bytes,
    )
        .into_response())
}
