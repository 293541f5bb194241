//! HTTP surface of the image browser
//!
//! - `routes`: axum router with the folder listing and image view endpoints
//! - `client`: [`HttpBackend`], an `ImageBrowserBackend` calling those endpoints

pub mod client;
pub mod error;
pub mod routes;

pub use client::HttpBackend;
pub use error::ApiError;
pub use routes::{router, EndpointConfig, ListImagesRequest, ViewParams};

/// Default path of the folder listing endpoint
pub const DEFAULT_IMAGES_ENDPOINT: &str = "/nhk/images";

/// Default path of the image view endpoint
pub const DEFAULT_VIEW_ENDPOINT: &str = "/nhk/view";

/// Default `max-age` for served images, in seconds
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 300;
