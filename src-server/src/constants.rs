//! Server-wide constants
//!
//! Single source of truth for ports, endpoint paths and configuration defaults.

/// Network port configuration
pub mod ports {
    /// Default port for the browser HTTP server
    pub const SERVER: u16 = 8189;
}

/// Server host configuration
pub mod hosts {
    /// Default host for local server binding
    pub const LOCAL: &str = "127.0.0.1";
}

/// HTTP endpoint paths
pub mod endpoints {
    pub use image_browser_http::{DEFAULT_IMAGES_ENDPOINT as IMAGES, DEFAULT_VIEW_ENDPOINT as VIEW};

    /// Node catalog
    pub const NODES: &str = "/nhk/nodes";
    /// Browser settings for front-ends
    pub const BROWSER_SETTINGS: &str = "/nhk/browser-settings";
    /// Liveness check
    pub const HEALTH: &str = "/health";
}

/// Default values for server configuration
pub mod defaults {
    pub use image_browser::session::DEFAULT_MIN_HEIGHT as MIN_BROWSER_HEIGHT;
    pub use image_browser_http::DEFAULT_CACHE_MAX_AGE_SECS as CACHE_MAX_AGE_SECS;
}

/// Configuration file location
pub mod paths {
    /// Directory under the platform config dir
    pub const CONFIG_DIR: &str = "nhk-image-browser";
    /// Configuration file name
    pub const CONFIG_FILE: &str = "config.json";
}
