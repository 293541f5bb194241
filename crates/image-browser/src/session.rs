//! Browser session state machine
//!
//! One session per node instance. The session holds the folder, sort mode,
//! last applied listing, the selection and the view mode, and decides every
//! transition. It performs no I/O: operations that need a folder scan return
//! a [`ScanRequest`], and the scan result comes back through
//! [`BrowserSession::apply_scan`].
//!
//! # Stale responses
//!
//! Every request carries a generation number. Only a response for the most
//! recently issued generation is applied; anything older is dropped. When a
//! request supersedes one still in flight, the stronger of the two reasons is
//! kept, so a folder change followed quickly by a sort change still clears
//! the selection.

use serde::{Deserialize, Serialize};

use crate::listing::FolderListing;
use crate::sort::SortMode;

/// Default minimum node height (px) for showing the browser
pub const DEFAULT_MIN_HEIGHT: f64 = 150.0;

/// Message shown when an applied listing has no images
pub const NO_IMAGES_MESSAGE: &str = "No images found";

/// What the node currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Node too small to show anything
    Collapsed,
    /// Thumbnail grid
    Grid,
    /// One image full-size with previous/next navigation
    Single,
}

/// Why a scan was requested; decides how its result is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScanReason {
    Refresh,
    SortChanged,
    InitialLoad,
    FolderChanged,
}

impl ScanReason {
    /// Reason for a request that supersedes `pending`
    fn superseding(self, pending: Option<ScanReason>) -> ScanReason {
        pending.map_or(self, |pending| self.max(pending))
    }
}

/// A folder scan the session is waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub generation: u64,
    pub folder_path: String,
    pub sort_mode: SortMode,
    pub reason: ScanReason,
}

/// Result of handing a scan response to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Applied,
    Stale,
}

/// Navigation arrows of the single-image view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

/// Serializable view of a session for the front-end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub folder_path: String,
    pub sort_mode: SortMode,
    pub images: FolderListing,
    pub selected_image: Option<String>,
    /// Index of the selection in `images`, `-1` when nothing is selected
    pub selected_index: i64,
    pub view: ViewMode,
    pub loading: bool,
    pub status_message: Option<String>,
}

/// Per-node browser state
#[derive(Debug, Clone)]
pub struct BrowserSession {
    folder_path: String,
    sort_mode: SortMode,
    listing: FolderListing,
    selected: Option<String>,
    view: ViewMode,
    min_height: f64,
    generation: u64,
    in_flight: Option<ScanRequest>,
    has_listing: bool,
    closed: bool,
}

impl BrowserSession {
    /// Open a session from persisted node values
    ///
    /// Returns the session together with the initial scan. Until that scan
    /// is applied the session shows an empty grid.
    pub fn open(
        folder_path: impl Into<String>,
        sort_mode: SortMode,
        persisted_selection: Option<String>,
        min_height: f64,
    ) -> (Self, ScanRequest) {
        let mut session = Self {
            folder_path: folder_path.into(),
            sort_mode,
            listing: FolderListing::default(),
            selected: persisted_selection.filter(|s| !s.is_empty()),
            view: ViewMode::Grid,
            min_height,
            generation: 0,
            in_flight: None,
            has_listing: false,
            closed: false,
        };
        let request = session.issue(ScanReason::InitialLoad);
        (session, request)
    }

    fn issue(&mut self, reason: ScanReason) -> ScanRequest {
        let pending = self.in_flight.as_ref().map(|r| r.reason);
        self.generation += 1;
        let request = ScanRequest {
            generation: self.generation,
            folder_path: self.folder_path.clone(),
            sort_mode: self.sort_mode,
            reason: reason.superseding(pending),
        };
        self.in_flight = Some(request.clone());
        request
    }

    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn listing(&self) -> &FolderListing {
        &self.listing
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Index of the selection in the current listing
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .as_deref()
            .and_then(|name| self.listing.position(name))
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Scan the session is waiting for, if any
    pub fn in_flight(&self) -> Option<&ScanRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Change the browsed folder
    ///
    /// The previous folder's listing and selection are dropped at once, so
    /// nothing from it can be picked while the new scan is pending.
    /// Returns `None` when the path is unchanged or the session is closed.
    pub fn set_folder_path(&mut self, folder_path: &str) -> Option<ScanRequest> {
        if self.closed || self.folder_path == folder_path {
            return None;
        }
        self.folder_path = folder_path.to_string();
        self.listing = FolderListing::default();
        self.has_listing = false;
        self.selected = None;
        if self.view == ViewMode::Single {
            self.view = ViewMode::Grid;
        }
        Some(self.issue(ScanReason::FolderChanged))
    }

    /// Change the sort mode; the selection is kept by filename
    pub fn set_sort_mode(&mut self, sort_mode: SortMode) -> Option<ScanRequest> {
        if self.closed || self.sort_mode == sort_mode {
            return None;
        }
        self.sort_mode = sort_mode;
        Some(self.issue(ScanReason::SortChanged))
    }

    /// Rescan the current folder with the current sort mode
    pub fn refresh(&mut self) -> Option<ScanRequest> {
        if self.closed {
            return None;
        }
        Some(self.issue(ScanReason::Refresh))
    }

    /// Apply a scan response
    pub fn apply_scan(&mut self, generation: u64, listing: FolderListing) -> ScanOutcome {
        let request = match self.in_flight.take() {
            Some(request) if !self.closed && request.generation == generation => request,
            other => {
                self.in_flight = other;
                log::debug!(
                    "BrowserSession: dropping stale scan {} (latest {})",
                    generation,
                    self.generation
                );
                return ScanOutcome::Stale;
            }
        };

        self.listing = listing;
        self.has_listing = true;

        match request.reason {
            ScanReason::FolderChanged => {
                // A selection from the previous folder is never carried over
                self.selected = None;
                self.show_unless_collapsed(ViewMode::Grid);
            }
            ScanReason::InitialLoad => {
                if self.selected_index().is_some() {
                    self.show_unless_collapsed(ViewMode::Single);
                } else {
                    self.selected = None;
                    self.show_unless_collapsed(ViewMode::Grid);
                }
            }
            ScanReason::SortChanged | ScanReason::Refresh => {
                if self.selected_index().is_none() {
                    self.selected = None;
                    if self.view == ViewMode::Single {
                        self.view = ViewMode::Grid;
                    }
                }
            }
        }

        log::debug!(
            "BrowserSession: applied scan {} ({:?}): {} images, view {:?}",
            generation,
            request.reason,
            self.listing.len(),
            self.view
        );

        ScanOutcome::Applied
    }

    fn show_unless_collapsed(&mut self, view: ViewMode) {
        if self.view != ViewMode::Collapsed {
            self.view = view;
        }
    }

    /// View to show when the node is large enough again
    fn expanded_view(&self) -> ViewMode {
        if self.selected_index().is_some() {
            ViewMode::Single
        } else {
            ViewMode::Grid
        }
    }

    /// Host resize notification
    pub fn resize(&mut self, height: f64) {
        if self.closed {
            return;
        }
        if height < self.min_height {
            self.view = ViewMode::Collapsed;
        } else if self.view == ViewMode::Collapsed {
            self.view = self.expanded_view();
        }
    }

    /// Thumbnail click in the grid; returns whether the state changed
    pub fn click_thumbnail(&mut self, filename: &str) -> bool {
        if self.closed || self.view != ViewMode::Grid || self.listing.position(filename).is_none() {
            return false;
        }
        self.selected = Some(filename.to_string());
        self.view = ViewMode::Single;
        true
    }

    /// Click on the single-image view: back to the grid, selection kept
    pub fn click_single_view(&mut self) -> bool {
        if self.closed || self.view != ViewMode::Single {
            return false;
        }
        self.view = ViewMode::Grid;
        true
    }

    /// Previous/next arrow; no-op at either end of the listing
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.closed || self.view != ViewMode::Single {
            return false;
        }
        let Some(index) = self.selected_index() else {
            return false;
        };

        let target = match direction {
            Direction::Previous => index.checked_sub(1),
            Direction::Next => index.checked_add(1).filter(|i| *i < self.listing.len()),
        };

        match target.and_then(|i| self.listing.filename_at(i)) {
            Some(filename) => {
                self.selected = Some(filename.to_string());
                true
            }
            None => false,
        }
    }

    /// Node removed: drop everything still in flight
    pub fn close(&mut self) {
        self.closed = true;
        self.generation += 1;
        self.in_flight = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let status_message = (self.has_listing && self.listing.is_empty())
            .then(|| NO_IMAGES_MESSAGE.to_string());

        SessionSnapshot {
            folder_path: self.folder_path.clone(),
            sort_mode: self.sort_mode,
            images: self.listing.clone(),
            selected_image: self.selected.clone(),
            selected_index: self
                .selected_index()
                .and_then(|i| i64::try_from(i).ok())
                .unwrap_or(-1),
            view: self.view,
            loading: self.in_flight.is_some(),
            status_message,
        }
    }
}
