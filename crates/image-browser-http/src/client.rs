//! HTTP backend for the browser controller
//!
//! Calls the listing and view endpoints of a running server. Listing tokens
//! are the server's relative view URLs.

use async_trait::async_trait;
use image_browser::{BrowserError, FolderListing, ImageBrowserBackend, ServedImage, SortMode};
use reqwest::{header, StatusCode};

use crate::routes::{EndpointConfig, ListImagesRequest};

/// `ImageBrowserBackend` talking to the browser endpoints over HTTP
pub struct HttpBackend {
    /// HTTP client for endpoint requests
    http_client: reqwest::Client,
    /// Base URL of the server, without trailing slash
    base_url: String,
    endpoints: EndpointConfig,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, endpoints: EndpointConfig) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            endpoints,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(e: reqwest::Error) -> BrowserError {
    BrowserError::Backend(e.to_string())
}

#[async_trait]
impl ImageBrowserBackend for HttpBackend {
    async fn list_images(
        &self,
        folder_path: &str,
        sort_mode: SortMode,
    ) -> image_browser::Result<FolderListing> {
        let url = format!("{}{}", self.base_url, self.endpoints.images_endpoint);
        let request = ListImagesRequest {
            folder_path: folder_path.to_string(),
            sort_mode: sort_mode.to_string(),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BrowserError::Backend(format!(
                "Listing API error {}: {}",
                status, body
            )));
        }

        response
            .json::<FolderListing>()
            .await
            .map_err(|e| BrowserError::Backend(format!("Failed to parse listing: {}", e)))
    }

    async fn fetch_image(
        &self,
        folder_path: &str,
        filename: &str,
    ) -> image_browser::Result<Option<ServedImage>> {
        let url = format!("{}{}", self.base_url, self.endpoints.view_endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&[("folder_path", folder_path), ("filename", filename)])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BrowserError::Backend(format!(
                "View API error {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await.map_err(transport_error)?;

        Ok(Some(ServedImage {
            filename: filename.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        }))
    }
}
