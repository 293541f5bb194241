//! Image Browser
//!
//! Backend and state for the image browser node:
//!
//! - **Folder Scanner** (`scanner`): lists image files of a folder in a requested order
//! - **Image Server** (`server`): returns the bytes of one image, rejecting traversal
//! - **Browser Session** (`session`): grid / single-image view state machine
//! - **Browser Controller** (`controller`): wires a session to a node instance and a backend
//!
//! The session never talks to the filesystem directly. It issues
//! [`ScanRequest`]s, the controller runs them through an
//! [`ImageBrowserBackend`] and hands the result back; responses from
//! superseded requests are discarded.
//!
//! # Embedding
//!
//! The server binary only exposes the stateless endpoints; per-node state
//! lives with the host. A host creates one controller per placed node,
//! forwards that node's callbacks as [`node_engine::NodeEvent`]s and renders
//! from [`BrowserController::snapshot`]. A host in the server process uses
//! [`LocalBackend`]; a remote one uses `image_browser_http::HttpBackend`.
//!
//! ```ignore
//! let node: Arc<dyn NodeInstance> = host_node_handle();
//! let controller =
//!     BrowserController::attach(Arc::new(LocalBackend::default()), node, DEFAULT_MIN_HEIGHT).await;
//!
//! controller.handle_event(NodeEvent::resized(320.0, 480.0)).await;
//! controller.handle_event(NodeEvent::field_changed("folder_path", "/renders")).await;
//! controller.click_thumbnail("0001.png");
//! let view = controller.snapshot();
//! ```

pub mod backend;
pub mod controller;
pub mod error;
pub mod fields;
pub mod listing;
pub mod media;
pub mod policy;
pub mod scanner;
pub mod server;
pub mod session;
pub mod sort;

pub use backend::{ImageBrowserBackend, LocalBackend};
pub use controller::BrowserController;
pub use error::{BrowserError, Result, ServeError};
pub use listing::FolderListing;
pub use policy::FolderPolicy;
pub use scanner::{scan_folder, ScannedImage};
pub use server::{resolve_image_path, serve_image, ServedImage};
pub use session::{
    BrowserSession, Direction, ScanOutcome, ScanReason, ScanRequest, SessionSnapshot, ViewMode,
};
pub use sort::SortMode;
