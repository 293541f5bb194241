//! Sort modes for folder scans

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::scanner::ScannedImage;

/// Ordering applied to a folder listing
///
/// The set is closed. `newest_first` / `oldest_first` are accepted as aliases
/// of the creation-time modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    NameAsc,
    NameDesc,
    ModifiedNewestFirst,
    ModifiedOldestFirst,
    #[serde(alias = "newest_first")]
    CreatedNewestFirst,
    #[serde(alias = "oldest_first")]
    CreatedOldestFirst,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::NameAsc,
        SortMode::NameDesc,
        SortMode::ModifiedNewestFirst,
        SortMode::ModifiedOldestFirst,
        SortMode::CreatedNewestFirst,
        SortMode::CreatedOldestFirst,
    ];

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::NameAsc => "name_asc",
            SortMode::NameDesc => "name_desc",
            SortMode::ModifiedNewestFirst => "modified_newest_first",
            SortMode::ModifiedOldestFirst => "modified_oldest_first",
            SortMode::CreatedNewestFirst => "created_newest_first",
            SortMode::CreatedOldestFirst => "created_oldest_first",
        }
    }

    /// Canonical wire names of every mode
    pub fn wire_names() -> Vec<&'static str> {
        Self::ALL.iter().map(SortMode::as_str).collect()
    }

    /// Compare two scanned images under this mode
    ///
    /// Timestamp ties fall back to filename ascending so equal metadata still
    /// yields one deterministic order.
    pub fn compare(&self, a: &ScannedImage, b: &ScannedImage) -> Ordering {
        let by_name = || a.filename.cmp(&b.filename);
        match self {
            SortMode::NameAsc => by_name(),
            SortMode::NameDesc => b.filename.cmp(&a.filename),
            SortMode::ModifiedNewestFirst => b.modified.cmp(&a.modified).then_with(by_name),
            SortMode::ModifiedOldestFirst => a.modified.cmp(&b.modified).then_with(by_name),
            SortMode::CreatedNewestFirst => b.created.cmp(&a.created).then_with(by_name),
            SortMode::CreatedOldestFirst => a.created.cmp(&b.created).then_with(by_name),
        }
    }
}

impl FromStr for SortMode {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest_first" => return Ok(SortMode::CreatedNewestFirst),
            "oldest_first" => return Ok(SortMode::CreatedOldestFirst),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| BrowserError::UnknownSortMode(s.to_string()))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn image(name: &str, modified_secs: u64, created_secs: u64) -> ScannedImage {
        ScannedImage {
            filename: name.to_string(),
            path: PathBuf::from(name),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(modified_secs),
            created: SystemTime::UNIX_EPOCH + Duration::from_secs(created_secs),
        }
    }

    fn sorted(mode: SortMode, images: &[ScannedImage]) -> Vec<String> {
        let mut images = images.to_vec();
        images.sort_by(|a, b| mode.compare(a, b));
        images.into_iter().map(|i| i.filename).collect()
    }

    #[test]
    fn test_parse_wire_names() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(
            "newest_first".parse::<SortMode>().unwrap(),
            SortMode::CreatedNewestFirst
        );
        assert_eq!(
            "oldest_first".parse::<SortMode>().unwrap(),
            SortMode::CreatedOldestFirst
        );
    }

    #[test]
    fn test_unknown_sort_mode_fails() {
        let err = "by_size".parse::<SortMode>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("by_size"));
        assert!(message.contains("name_asc"));
        assert!("NAME_ASC".parse::<SortMode>().is_err());
        assert!("".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let mode: SortMode = serde_json::from_str("\"oldest_first\"").unwrap();
        assert_eq!(mode, SortMode::CreatedOldestFirst);
        assert_eq!(
            serde_json::to_string(&SortMode::ModifiedNewestFirst).unwrap(),
            "\"modified_newest_first\""
        );
        assert!(serde_json::from_str::<SortMode>("\"random\"").is_err());
    }

    #[test]
    fn test_name_sort_is_case_aware() {
        let images = [image("b.png", 0, 0), image("B.png", 0, 0), image("a.png", 0, 0)];
        assert_eq!(sorted(SortMode::NameAsc, &images), vec!["B.png", "a.png", "b.png"]);
        assert_eq!(sorted(SortMode::NameDesc, &images), vec!["b.png", "a.png", "B.png"]);
    }

    #[test]
    fn test_timestamp_ties_break_by_name() {
        let images = [image("c.png", 5, 1), image("a.png", 5, 1), image("b.png", 9, 2)];
        assert_eq!(
            sorted(SortMode::ModifiedNewestFirst, &images),
            vec!["b.png", "a.png", "c.png"]
        );
        assert_eq!(
            sorted(SortMode::ModifiedOldestFirst, &images),
            vec!["a.png", "c.png", "b.png"]
        );
        assert_eq!(
            sorted(SortMode::CreatedOldestFirst, &images),
            vec!["a.png", "c.png", "b.png"]
        );
    }
}
