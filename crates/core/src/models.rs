use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Collection label used when no path anchor is recognized.
pub const DEFAULT_COLLECTION: &str = "Uncategorized";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Text,
    Image,
    Video,
    Data,
    #[default]
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Text => "text",
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Data => "data",
            FileCategory::Other => "other",
        }
    }
}

/// Content digest, or a sentinel for files too large to hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentHash {
    /// First 8 hex characters of the MD5 digest.
    Digest(String),
    /// Files at or above the size cutoff are never read in full.
    LargeFile,
}

const LARGE_FILE_SENTINEL: &str = "large_file";

impl ContentHash {
    pub fn as_str(&self) -> &str {
        match self {
            ContentHash::Digest(hex) => hex,
            ContentHash::LargeFile => LARGE_FILE_SENTINEL,
        }
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == LARGE_FILE_SENTINEL {
            ContentHash::LargeFile
        } else {
            ContentHash::Digest(raw)
        })
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum SourceCategory {
    #[serde(rename = "doj")]
    Doj,
    #[serde(rename = "court")]
    Court,
    #[serde(rename = "maxwell")]
    Maxwell,
    #[serde(rename = "estate")]
    Estate,
    #[serde(rename = "usvi")]
    Usvi,
    #[serde(rename = "S3_ARCHIVE")]
    #[default]
    ArchiveDefault,
}

/// One scanned file, enriched in place as it moves through the pipeline.
/// Lives only for the duration of a run; the views are the persistent output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub filename: String,
    /// Original filesystem path as scanned.
    pub path: String,
    /// Lowercase suffix including the dot; empty when the file has none.
    pub extension: String,
    pub category: FileCategory,
    pub size_bytes: u64,
    pub size_human: String,
    pub created: String,
    pub modified: String,
    pub hash: ContentHash,
    pub canonical_path: String,
    pub collection: String,
    pub public_url: String,
    pub tags: BTreeSet<String>,
    pub source: SourceCategory,
}

/// Catalog entry emitted by the master-archive view.
///
/// Ids are positional within the run's record list, so a rerun over a
/// changed tree reassigns them. Kept for frontend compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub collection: String,
    #[serde(rename = "type")]
    pub category: FileCategory,
    pub date: String,
    pub description: String,
    pub source: SourceCategory,
    pub tags: BTreeSet<String>,
}
