//! Input nodes
//!
//! Nodes that load images from folders on disk.

mod image_browser;
mod image_series;

pub use image_browser::LoadImageFromBrowserTask;
pub use image_series::{LoadImageSeriesTask, SeriesCounters, SeriesMode, DEFAULT_SERIES_LABEL};
