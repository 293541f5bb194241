//! Widget field names persisted by the host for an image browser node

/// Folder being browsed
pub const FOLDER_PATH: &str = "folder_path";

/// Sort mode wire name
pub const SORT_MODE: &str = "sort_mode";

/// Selected filename; the value the node hands to graph execution
pub const SELECTED_IMAGE: &str = "selected_image";
