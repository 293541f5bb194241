//! Image Series Task
//!
//! Walks the images of a folder across runs. Three modes:
//!
//! - `single_image`: the image at a fixed index
//! - `incremental_image`: advances one image per run, wrapping at the end
//! - `random`: an index drawn from a seeded generator
//!
//! Incremental position is tracked per label in a process-wide store, so
//! every series node using one label advances the same counter while
//! different labels never interfere.
//!
//! Images are the files under the folder matching a glob `pattern` (default
//! `*`; `**` descends into subfolders), ordered by full path. Matches that
//! resolve outside the folder are ignored.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use glob::MatchOptions;
use graph_flow::{Context, GraphError, NextAction, Task, TaskResult};
use image_browser::{media, FolderPolicy};
use node_engine::{
    ContextKeys, ExecutionMode, NodeCategory, PortDataType, PortMetadata, TaskDescriptor,
    TaskMetadata,
};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Label used when none is connected
pub const DEFAULT_SERIES_LABEL: &str = "Series001";

/// Pattern used when none is connected
pub const DEFAULT_SERIES_PATTERN: &str = "*";

static SHARED_COUNTERS: LazyLock<Arc<SeriesCounters>> =
    LazyLock::new(|| Arc::new(SeriesCounters::new()));

/// How the next image is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    #[default]
    SingleImage,
    IncrementalImage,
    Random,
}

impl SeriesMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesMode::SingleImage => "single_image",
            SeriesMode::IncrementalImage => "incremental_image",
            SeriesMode::Random => "random",
        }
    }
}

impl FromStr for SeriesMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_image" => Ok(SeriesMode::SingleImage),
            "incremental_image" => Ok(SeriesMode::IncrementalImage),
            "random" => Ok(SeriesMode::Random),
            other => Err(format!(
                "Unknown series mode '{}', expected single_image, incremental_image or random",
                other
            )),
        }
    }
}

impl fmt::Display for SeriesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incremental positions keyed by series label
#[derive(Debug, Default)]
pub struct SeriesCounters {
    positions: Mutex<HashMap<String, usize>>,
}

impl SeriesCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters shared by every series task created with `LoadImageSeriesTask::new`
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED_COUNTERS)
    }

    pub fn reset(&self, label: &str) {
        self.positions.lock().insert(label.to_string(), 0);
    }

    /// Current position for `label`, without advancing
    pub fn position(&self, label: &str) -> usize {
        self.positions.lock().get(label).copied().unwrap_or(0)
    }

    /// Take the current index for `label` and advance, wrapping at `total`
    fn advance(&self, label: &str, total: usize) -> usize {
        let mut positions = self.positions.lock();
        let position = positions.entry(label.to_string()).or_insert(0);
        if *position >= total {
            *position = 0;
        }
        let current = *position;
        *position = (current + 1) % total;
        current
    }
}

/// Image files below `dir` matching `pattern`, sorted by path
fn matching_images(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern.trim_start_matches('/')
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut images: Vec<PathBuf> = glob::glob_with(&full, options)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("LoadImageSeriesTask: skipping unreadable match: {}", e);
                None
            }
        })
        .filter(|path| media::is_image_file(path))
        .filter(|path| {
            std::fs::canonicalize(path)
                .is_ok_and(|target| target.starts_with(dir) && target.is_file())
        })
        .collect();

    images.sort();
    Ok(images)
}

/// Image picked for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SeriesPick {
    image_path: String,
    filename: String,
    current_index: usize,
    total_images: usize,
}

/// Image Series Task
///
/// # Inputs (from context)
/// - `{task_id}.input.path` (required) - Folder to read
/// - `{task_id}.input.pattern` (optional) - Glob below the folder, default `*`
/// - `{task_id}.input.mode` (optional) - `single_image`, `incremental_image` or `random`
/// - `{task_id}.input.index` (optional) - Index for `single_image`
/// - `{task_id}.input.seed` (optional) - Seed for `random`
/// - `{task_id}.input.label` (optional) - Counter label for `incremental_image`
/// - `{task_id}.input.reset` (optional) - Restart the labelled counter first
///
/// # Outputs (to context)
/// - `{task_id}.output.image_path` - Absolute path, empty when nothing was picked
/// - `{task_id}.output.filename` - Filename, empty when nothing was picked
/// - `{task_id}.output.current_index` - Index of the picked image
/// - `{task_id}.output.total_images` - Number of images in the folder
#[derive(Clone)]
pub struct LoadImageSeriesTask {
    task_id: String,
    policy: Arc<FolderPolicy>,
    counters: Arc<SeriesCounters>,
}

impl LoadImageSeriesTask {
    pub const PORT_PATH: &'static str = "path";
    pub const PORT_PATTERN: &'static str = "pattern";
    pub const PORT_MODE: &'static str = "mode";
    pub const PORT_INDEX: &'static str = "index";
    pub const PORT_SEED: &'static str = "seed";
    pub const PORT_LABEL: &'static str = "label";
    pub const PORT_RESET: &'static str = "reset";
    pub const PORT_IMAGE_PATH: &'static str = "image_path";
    pub const PORT_FILENAME: &'static str = "filename";
    pub const PORT_CURRENT_INDEX: &'static str = "current_index";
    pub const PORT_TOTAL_IMAGES: &'static str = "total_images";

    /// Unrestricted task using the process-wide counters
    pub fn new(task_id: impl Into<String>) -> Self {
        Self::with_state(
            task_id,
            Arc::new(FolderPolicy::unrestricted()),
            SeriesCounters::shared(),
        )
    }

    /// Create a task with its own folder policy and counter store
    pub fn with_state(
        task_id: impl Into<String>,
        policy: Arc<FolderPolicy>,
        counters: Arc<SeriesCounters>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            policy,
            counters,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn counters(&self) -> &Arc<SeriesCounters> {
        &self.counters
    }

    async fn input<T: serde::de::DeserializeOwned>(&self, context: &Context, port: &str) -> Option<T> {
        context.get(&ContextKeys::input(&self.task_id, port)).await
    }

    /// Integer input that may arrive as an integer or a float
    async fn integer_input(&self, context: &Context, port: &str) -> Option<i64> {
        let value: serde_json::Value = self.input(context, port).await?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }

    /// Index to load this run; `None` for an out-of-range `single_image` index
    fn pick(&self, mode: SeriesMode, total: usize, index: i64, seed: u64, label: &str) -> Option<usize> {
        match mode {
            SeriesMode::SingleImage => usize::try_from(index).ok().filter(|i| *i < total),
            SeriesMode::IncrementalImage => {
                let current = self.counters.advance(label, total);
                log::info!(
                    "LoadImageSeriesTask {}: series {} image {}/{}",
                    self.task_id,
                    label,
                    current + 1,
                    total
                );
                Some(current)
            }
            SeriesMode::Random => Some(StdRng::seed_from_u64(seed).gen_range(0..total)),
        }
    }
}

impl TaskDescriptor for LoadImageSeriesTask {
    fn descriptor() -> TaskMetadata {
        TaskMetadata {
            node_type: "load-image-series".to_string(),
            category: NodeCategory::Input,
            label: "Load Image Series".to_string(),
            description: "Loads images from a folder by index, in sequence or at random"
                .to_string(),
            inputs: vec![
                PortMetadata::required(Self::PORT_PATH, "Folder", PortDataType::String),
                PortMetadata::optional(Self::PORT_PATTERN, "Pattern", PortDataType::String)
                    .with_default(serde_json::json!(DEFAULT_SERIES_PATTERN)),
                PortMetadata::optional(Self::PORT_MODE, "Mode", PortDataType::String)
                    .with_default(serde_json::json!(SeriesMode::default().as_str())),
                PortMetadata::optional(Self::PORT_INDEX, "Index", PortDataType::Number)
                    .with_default(serde_json::json!(0)),
                PortMetadata::optional(Self::PORT_SEED, "Seed", PortDataType::Number)
                    .with_default(serde_json::json!(0)),
                PortMetadata::optional(Self::PORT_LABEL, "Label", PortDataType::String)
                    .with_default(serde_json::json!(DEFAULT_SERIES_LABEL)),
                PortMetadata::optional(Self::PORT_RESET, "Reset", PortDataType::Boolean)
                    .with_default(serde_json::json!(false)),
            ],
            outputs: vec![
                PortMetadata::optional(Self::PORT_IMAGE_PATH, "Image", PortDataType::Image),
                PortMetadata::optional(Self::PORT_FILENAME, "Filename", PortDataType::String),
                PortMetadata::optional(Self::PORT_CURRENT_INDEX, "Current Index", PortDataType::Number),
                PortMetadata::optional(Self::PORT_TOTAL_IMAGES, "Total Images", PortDataType::Number),
            ],
            execution_mode: ExecutionMode::EveryRun,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(LoadImageSeriesTask::descriptor));

#[async_trait]
impl Task for LoadImageSeriesTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let path_key = ContextKeys::input(&self.task_id, Self::PORT_PATH);
        let path: String = context.get(&path_key).await.ok_or_else(|| {
            GraphError::TaskExecutionFailed(format!(
                "Missing required input 'path' at key '{}'",
                path_key
            ))
        })?;

        let mode = match self.input::<String>(&context, Self::PORT_MODE).await {
            Some(raw) => raw
                .parse::<SeriesMode>()
                .map_err(GraphError::TaskExecutionFailed)?,
            None => SeriesMode::default(),
        };
        let pattern = self
            .input::<String>(&context, Self::PORT_PATTERN)
            .await
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERIES_PATTERN.to_string());
        let label = self
            .input::<String>(&context, Self::PORT_LABEL)
            .await
            .unwrap_or_else(|| DEFAULT_SERIES_LABEL.to_string());
        let index = self.integer_input(&context, Self::PORT_INDEX).await.unwrap_or(0);
        let seed = self.integer_input(&context, Self::PORT_SEED).await.unwrap_or(0) as u64;

        if self
            .input::<bool>(&context, Self::PORT_RESET)
            .await
            .unwrap_or(false)
        {
            self.counters.reset(&label);
            log::info!("LoadImageSeriesTask {}: series {} reset", self.task_id, label);
        }

        let paths: Vec<String> = match self.policy.resolve_folder(&path).await {
            Some(dir) => {
                let glob_pattern = pattern.clone();
                tokio::task::spawn_blocking(move || matching_images(&dir, &glob_pattern))
                    .await
                    .map_err(|e| {
                        GraphError::TaskExecutionFailed(format!("Listing '{}' failed: {}", path, e))
                    })?
                    .map_err(|e| {
                        GraphError::TaskExecutionFailed(format!(
                            "Invalid pattern '{}': {}",
                            pattern, e
                        ))
                    })?
                    .into_iter()
                    .map(|image| image.to_string_lossy().to_string())
                    .collect()
            }
            None => Vec::new(),
        };

        let pick = if paths.is_empty() {
            log::warn!(
                "LoadImageSeriesTask {}: no images in '{}' matching '{}'",
                self.task_id,
                path,
                pattern
            );
            SeriesPick::default()
        } else {
            match self.pick(mode, paths.len(), index, seed, &label) {
                Some(current_index) => {
                    let image_path = paths[current_index].clone();
                    let filename = std::path::Path::new(&image_path)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    SeriesPick {
                        image_path,
                        filename,
                        current_index,
                        total_images: paths.len(),
                    }
                }
                None => {
                    log::warn!(
                        "LoadImageSeriesTask {}: invalid index {} for {} images",
                        self.task_id,
                        index,
                        paths.len()
                    );
                    SeriesPick {
                        total_images: paths.len(),
                        ..SeriesPick::default()
                    }
                }
            }
        };

        let key = |port: &str| ContextKeys::output(&self.task_id, port);
        context
            .set(&key(Self::PORT_IMAGE_PATH), pick.image_path.clone())
            .await;
        context.set(&key(Self::PORT_FILENAME), pick.filename).await;
        context
            .set(&key(Self::PORT_CURRENT_INDEX), pick.current_index)
            .await;
        context
            .set(&key(Self::PORT_TOTAL_IMAGES), pick.total_images)
            .await;

        Ok(TaskResult::new(Some(pick.image_path), NextAction::Continue))
    }
}
