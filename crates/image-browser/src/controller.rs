//! Browser controller
//!
//! Binds one [`BrowserSession`] to a node instance and a backend. Host events
//! and user clicks go through the controller; it runs the scans the session
//! asks for and writes every selection change back to the node's
//! `selected_image` field so the host persists it and the loader node can
//! read it at execution time.
//!
//! The session lock is only held for synchronous transitions, never across a
//! backend call, so overlapping scans are possible and are settled by the
//! session's generation check.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use node_engine::{NodeEvent, NodeEventHandler, NodeInstance};

use crate::backend::ImageBrowserBackend;
use crate::error::Result;
use crate::fields;
use crate::listing::FolderListing;
use crate::server::ServedImage;
use crate::session::{BrowserSession, Direction, ScanOutcome, ScanRequest, SessionSnapshot};
use crate::sort::SortMode;

/// Drives a browser session for one node instance
pub struct BrowserController {
    backend: Arc<dyn ImageBrowserBackend>,
    node: Arc<dyn NodeInstance>,
    session: Mutex<BrowserSession>,
}

impl BrowserController {
    /// Attach to a node, restoring its persisted fields, and run the initial scan
    pub async fn attach(
        backend: Arc<dyn ImageBrowserBackend>,
        node: Arc<dyn NodeInstance>,
        min_height: f64,
    ) -> Self {
        let folder_path = node.field_str(fields::FOLDER_PATH).unwrap_or_default();
        let sort_mode = match node.field_str(fields::SORT_MODE) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!(
                    "Image browser {}: {}; using {}",
                    node.node_id(),
                    e,
                    SortMode::default()
                );
                SortMode::default()
            }),
            None => SortMode::default(),
        };
        let persisted = node.field_str(fields::SELECTED_IMAGE);

        log::info!(
            "Image browser {} attached: folder '{}', sort {}",
            node.node_id(),
            folder_path,
            sort_mode
        );

        let (session, request) = BrowserSession::open(folder_path, sort_mode, persisted, min_height);
        let controller = Self {
            backend,
            node,
            session: Mutex::new(session),
        };
        controller.run_scan(request).await;
        controller
    }

    /// Apply a synchronous transition and mirror any selection change to the node
    fn update<R>(&self, transition: impl FnOnce(&mut BrowserSession) -> R) -> R {
        let (result, changed) = {
            let mut session = self.session.lock();
            let before = session.selected().map(str::to_string);
            let result = transition(&mut session);
            let after = session.selected().map(str::to_string);
            (result, (before != after).then_some(after))
        };

        if let Some(selection) = changed {
            self.node.set_field_value(
                fields::SELECTED_IMAGE,
                serde_json::Value::String(selection.unwrap_or_default()),
            );
        }
        result
    }

    async fn run_scan(&self, request: ScanRequest) -> ScanOutcome {
        let listing = match self
            .backend
            .list_images(&request.folder_path, request.sort_mode)
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!(
                    "Image browser {}: listing '{}' failed: {}",
                    self.node.node_id(),
                    request.folder_path,
                    e
                );
                FolderListing::default()
            }
        };

        self.update(|session| session.apply_scan(request.generation, listing))
    }

    async fn run_if_requested(&self, request: Option<ScanRequest>) {
        if let Some(request) = request {
            self.run_scan(request).await;
        }
    }

    pub async fn set_folder_path(&self, folder_path: &str) {
        let request = self.update(|session| session.set_folder_path(folder_path));
        self.run_if_requested(request).await;
    }

    pub async fn set_sort_mode(&self, sort_mode: SortMode) {
        let request = self.update(|session| session.set_sort_mode(sort_mode));
        self.run_if_requested(request).await;
    }

    /// Rescan the current folder
    pub async fn refresh(&self) {
        let request = self.update(BrowserSession::refresh);
        self.run_if_requested(request).await;
    }

    pub fn click_thumbnail(&self, filename: &str) -> bool {
        self.update(|session| session.click_thumbnail(filename))
    }

    pub fn click_single_view(&self) -> bool {
        self.update(BrowserSession::click_single_view)
    }

    pub fn navigate(&self, direction: Direction) -> bool {
        self.update(|session| session.navigate(direction))
    }

    pub fn resize(&self, height: f64) {
        self.update(|session| session.resize(height));
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().snapshot()
    }

    pub fn selected_image(&self) -> Option<String> {
        self.session.lock().selected().map(str::to_string)
    }

    /// Fetch an image of the current folder (thumbnail or full view)
    pub async fn fetch_image(&self, filename: &str) -> Result<Option<ServedImage>> {
        let folder_path = self.session.lock().folder_path().to_string();
        self.backend.fetch_image(&folder_path, filename).await
    }
}

#[async_trait]
impl NodeEventHandler for BrowserController {
    async fn handle_event(&self, event: NodeEvent) {
        match event {
            NodeEvent::Resized { height, .. } => self.resize(height),
            NodeEvent::FieldChanged { name, value } => match name.as_str() {
                fields::FOLDER_PATH => match value.as_str() {
                    Some(folder_path) => self.set_folder_path(folder_path).await,
                    None => log::warn!(
                        "Image browser {}: ignoring non-string folder path {}",
                        self.node.node_id(),
                        value
                    ),
                },
                fields::SORT_MODE => {
                    match value.as_str().map(str::parse::<SortMode>) {
                        Some(Ok(sort_mode)) => self.set_sort_mode(sort_mode).await,
                        Some(Err(e)) => {
                            log::warn!("Image browser {}: {}", self.node.node_id(), e)
                        }
                        None => log::warn!(
                            "Image browser {}: ignoring non-string sort mode {}",
                            self.node.node_id(),
                            value
                        ),
                    }
                }
                _ => log::debug!(
                    "Image browser {}: field '{}' changed, nothing to do",
                    self.node.node_id(),
                    name
                ),
            },
            NodeEvent::Removed => {
                log::info!("Image browser {} removed", self.node.node_id());
                self.session.lock().close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use node_engine::MemoryNodeInstance;
    use serde_json::json;

    use super::*;
    use crate::error::BrowserError;
    use crate::session::ViewMode;

    /// Backend serving fixed name-ordered listings, with optional per-folder delay
    #[derive(Default)]
    struct ScriptedBackend {
        folders: HashMap<String, Vec<&'static str>>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<(String, SortMode)>>,
    }

    impl ScriptedBackend {
        fn folder(mut self, path: &str, names: &[&'static str]) -> Self {
            self.folders.insert(path.to_string(), names.to_vec());
            self
        }

        fn delayed(mut self, path: &str, delay: Duration) -> Self {
            self.delays.insert(path.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl ImageBrowserBackend for ScriptedBackend {
        async fn list_images(
            &self,
            folder_path: &str,
            sort_mode: SortMode,
        ) -> Result<FolderListing> {
            self.calls.lock().push((folder_path.to_string(), sort_mode));
            if let Some(delay) = self.delays.get(folder_path) {
                tokio::time::sleep(*delay).await;
            }
            let Some(names) = self.folders.get(folder_path) else {
                return Err(BrowserError::Backend(format!("no such folder {folder_path}")));
            };

            let mut names = names.clone();
            if sort_mode == SortMode::NameDesc {
                names.reverse();
            }
            Ok(FolderListing::from_entries(
                names
                    .into_iter()
                    .map(|n| (n.to_string(), format!("{folder_path}/{n}"))),
            ))
        }

        async fn fetch_image(
            &self,
            _folder_path: &str,
            _filename: &str,
        ) -> Result<Option<ServedImage>> {
            Ok(None)
        }
    }

    fn node(folder: &str) -> Arc<MemoryNodeInstance> {
        Arc::new(MemoryNodeInstance::new("browser-1").with_field(fields::FOLDER_PATH, folder))
    }

    async fn attach(backend: ScriptedBackend, node: Arc<MemoryNodeInstance>) -> BrowserController {
        BrowserController::attach(Arc::new(backend), node, 150.0).await
    }

    fn names(controller: &BrowserController) -> Vec<String> {
        controller
            .snapshot()
            .images
            .filenames()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_attach_runs_initial_scan() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png", "b.png"]);
        let controller = attach(backend, node("/images")).await;

        let snapshot = controller.snapshot();
        assert_eq!(names(&controller), vec!["a.png", "b.png"]);
        assert_eq!(snapshot.view, ViewMode::Grid);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.images.token("a.png"), Some("/images/a.png"));
    }

    #[tokio::test]
    async fn test_attach_restores_persisted_selection() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png", "b.png"]);
        let node = Arc::new(
            MemoryNodeInstance::new("browser-1")
                .with_field(fields::FOLDER_PATH, "/images")
                .with_field(fields::SORT_MODE, "name_desc")
                .with_field(fields::SELECTED_IMAGE, "a.png"),
        );
        let controller = attach(backend, node.clone()).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.sort_mode, SortMode::NameDesc);
        assert_eq!(snapshot.view, ViewMode::Single);
        assert_eq!(snapshot.selected_index, 1);
        assert!(node.writes().is_empty());
    }

    #[tokio::test]
    async fn test_attach_clears_stale_persisted_selection() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png"]);
        let node = Arc::new(
            MemoryNodeInstance::new("browser-1")
                .with_field(fields::FOLDER_PATH, "/images")
                .with_field(fields::SELECTED_IMAGE, "deleted.png"),
        );
        let controller = attach(backend, node.clone()).await;

        assert_eq!(controller.snapshot().view, ViewMode::Grid);
        assert_eq!(node.writes_to(fields::SELECTED_IMAGE), vec![json!("")]);
    }

    #[tokio::test]
    async fn test_attach_with_unknown_sort_uses_default() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png"]);
        let node = Arc::new(
            MemoryNodeInstance::new("browser-1")
                .with_field(fields::FOLDER_PATH, "/images")
                .with_field(fields::SORT_MODE, "sideways"),
        );
        let controller = attach(backend, node).await;
        assert_eq!(controller.snapshot().sort_mode, SortMode::NameAsc);
    }

    #[tokio::test]
    async fn test_selection_changes_are_written_to_node() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png", "b.png", "c.png"]);
        let node = node("/images");
        let controller = attach(backend, node.clone()).await;

        assert!(controller.click_thumbnail("a.png"));
        assert!(controller.navigate(Direction::Next));
        assert!(!controller.click_thumbnail("c.png"));
        assert!(controller.click_single_view());
        assert!(controller.click_thumbnail("b.png"));

        assert_eq!(
            node.writes_to(fields::SELECTED_IMAGE),
            vec![json!("a.png"), json!("b.png")]
        );
        assert_eq!(controller.selected_image().as_deref(), Some("b.png"));
        assert_eq!(node.field_str(fields::SELECTED_IMAGE).as_deref(), Some("b.png"));
    }

    #[tokio::test]
    async fn test_folder_change_event_clears_selection() {
        let backend = ScriptedBackend::default()
            .folder("/images", &["a.png", "b.png"])
            .folder("/other", &["b.png"]);
        let node = node("/images");
        let controller = attach(backend, node.clone()).await;

        controller.click_thumbnail("b.png");
        controller
            .handle_event(NodeEvent::field_changed(fields::FOLDER_PATH, "/other"))
            .await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.folder_path, "/other");
        assert_eq!(snapshot.selected_image, None);
        assert_eq!(snapshot.view, ViewMode::Grid);
        assert_eq!(
            node.writes_to(fields::SELECTED_IMAGE),
            vec![json!("b.png"), json!("")]
        );
    }

    #[tokio::test]
    async fn test_click_during_pending_folder_scan_is_ignored() {
        let backend = ScriptedBackend::default()
            .folder("/images", &["a.png"])
            .folder("/other", &["a.png", "z.png"])
            .delayed("/other", Duration::from_millis(100));
        let node = node("/images");
        let controller = attach(backend, node.clone()).await;

        tokio::join!(controller.set_folder_path("/other"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(controller.snapshot().loading);
            assert!(!controller.click_thumbnail("a.png"));
            assert_eq!(node.field_str(fields::SELECTED_IMAGE), None);
        });

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.folder_path, "/other");
        assert_eq!(snapshot.selected_image, None);
        assert_eq!(snapshot.view, ViewMode::Grid);
        assert!(node.writes_to(fields::SELECTED_IMAGE).is_empty());
    }

    #[tokio::test]
    async fn test_sort_change_event_keeps_selection() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png", "b.png", "c.png"]);
        let controller = attach(backend, node("/images")).await;

        controller.click_thumbnail("a.png");
        controller
            .handle_event(NodeEvent::field_changed(fields::SORT_MODE, "name_desc"))
            .await;

        let snapshot = controller.snapshot();
        assert_eq!(names(&controller), vec!["c.png", "b.png", "a.png"]);
        assert_eq!(snapshot.selected_image.as_deref(), Some("a.png"));
        assert_eq!(snapshot.selected_index, 2);
        assert_eq!(snapshot.view, ViewMode::Single);
    }

    #[tokio::test]
    async fn test_invalid_sort_event_is_ignored() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png"]);
        let controller = attach(backend, node("/images")).await;

        controller
            .handle_event(NodeEvent::field_changed(fields::SORT_MODE, "by_color"))
            .await;
        assert_eq!(controller.snapshot().sort_mode, SortMode::NameAsc);
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest_folder() {
        let backend = ScriptedBackend::default()
            .folder("/images", &["a.png"])
            .folder("/slow", &["slow.png"])
            .folder("/fast", &["fast.png"])
            .delayed("/slow", Duration::from_millis(100));
        let controller = attach(backend, node("/images")).await;

        tokio::join!(
            controller.handle_event(NodeEvent::field_changed(fields::FOLDER_PATH, "/slow")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                controller
                    .handle_event(NodeEvent::field_changed(fields::FOLDER_PATH, "/fast"))
                    .await;
            }
        );

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.folder_path, "/fast");
        assert_eq!(names(&controller), vec!["fast.png"]);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_empty_listing() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png"]);
        let controller = attach(backend, node("/images")).await;

        controller.set_folder_path("/missing").await;

        let snapshot = controller.snapshot();
        assert!(snapshot.images.is_empty());
        assert_eq!(snapshot.status_message.as_deref(), Some("No images found"));
    }

    #[tokio::test]
    async fn test_resize_events() {
        let backend = ScriptedBackend::default().folder("/images", &["a.png"]);
        let controller = attach(backend, node("/images")).await;

        controller.handle_event(NodeEvent::resized(300.0, 60.0)).await;
        assert_eq!(controller.snapshot().view, ViewMode::Collapsed);
        controller.handle_event(NodeEvent::resized(300.0, 400.0)).await;
        assert_eq!(controller.snapshot().view, ViewMode::Grid);
    }

    #[tokio::test]
    async fn test_removed_node_stops_scanning() {
        let backend = Arc::new(ScriptedBackend::default().folder("/images", &["a.png"]));
        let controller =
            BrowserController::attach(backend.clone(), node("/images"), 150.0).await;

        controller.handle_event(NodeEvent::Removed).await;
        controller
            .handle_event(NodeEvent::field_changed(fields::FOLDER_PATH, "/elsewhere"))
            .await;
        controller.refresh().await;

        assert_eq!(backend.calls.lock().len(), 1);
        assert_eq!(controller.snapshot().folder_path, "/images");
    }

    #[tokio::test]
    async fn test_refresh_rescans_with_current_key() {
        let backend = Arc::new(ScriptedBackend::default().folder("/images", &["a.png"]));
        let controller =
            BrowserController::attach(backend.clone(), node("/images"), 150.0).await;

        controller.set_sort_mode(SortMode::ModifiedOldestFirst).await;
        controller.refresh().await;

        let calls = backend.calls.lock().clone();
        assert_eq!(
            calls.last(),
            Some(&("/images".to_string(), SortMode::ModifiedOldestFirst))
        );
        assert_eq!(calls.len(), 3);
    }
}
