//! Folder listing result
//!
//! An ordered `filename -> token` mapping. The JSON form is an object whose
//! key order is the sort order, so it is serialized and parsed by hand rather
//! than through a hash map.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::scanner::ScannedImage;

/// Ordered mapping from filename to a reference token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    entries: Vec<(String, String)>,
}

impl FolderListing {
    /// Build a listing from scan results, in scan order
    pub fn from_scan(images: &[ScannedImage], token: impl Fn(&ScannedImage) -> String) -> Self {
        Self {
            entries: images
                .iter()
                .map(|image| (image.filename.clone(), token(image)))
                .collect(),
        }
    }

    /// Build a listing from `(filename, token)` pairs; later duplicates are dropped
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut listing = Self::default();
        for (filename, token) in entries {
            listing.push(filename, token);
        }
        listing
    }

    fn push(&mut self, filename: String, token: String) {
        if self.position(&filename).is_none() {
            self.entries.push((filename, token));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filenames in order
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// Index of a filename in the listing order
    pub fn position(&self, filename: &str) -> Option<usize> {
        self.entries.iter().position(|(f, _)| f == filename)
    }

    /// Filename at an index
    pub fn filename_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(f, _)| f.as_str())
    }

    /// Token of a filename
    pub fn token(&self, filename: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == filename)
            .map(|(_, t)| t.as_str())
    }
}

impl Serialize for FolderListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (filename, token) in &self.entries {
            map.serialize_entry(filename, token)?;
        }
        map.end()
    }
}

struct ListingVisitor;

impl<'de> Visitor<'de> for ListingVisitor {
    type Value = FolderListing;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping filenames to tokens")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut listing = FolderListing::default();
        while let Some((filename, token)) = access.next_entry::<String, String>()? {
            listing.push(filename, token);
        }
        Ok(listing)
    }
}

impl<'de> Deserialize<'de> for FolderListing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ListingVisitor)
    }
}
