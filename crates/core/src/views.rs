//! The five derived JSON views. Each builder is independent and consumes the
//! full enriched record slice; writers go through temp-then-rename so a crash
//! mid-write never leaves a truncated document behind.

use crate::models::{EvidenceRecord, FileCategory, FileRecord};
use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOCUMENTS_FILE: &str = "documents.json";
pub const TIMELINE_FILE: &str = "timeline.json";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const MASTER_ARCHIVE_FILE: &str = "master_archive.json";

/// Hard cap on records embedded in the documents view, for output size.
const MAX_LISTED_FILES: usize = 1000;
const MAX_TIMELINE_MONTHS: usize = 12;

#[derive(Debug, Serialize)]
pub struct DocumentsView {
    pub statistics: Statistics,
    pub files: Vec<FileRecord>,
    pub by_category: BTreeMap<&'static str, Vec<FileRecord>>,
}

#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total_files: usize,
    pub total_size: u64,
    pub by_category: BTreeMap<&'static str, usize>,
    pub last_updated: String,
}

pub fn documents_view(records: &[FileRecord]) -> DocumentsView {
    let mut by_category: BTreeMap<&'static str, Vec<FileRecord>> = BTreeMap::new();
    for record in records {
        by_category
            .entry(record.category.as_str())
            .or_default()
            .push(record.clone());
    }
    let counts = by_category
        .iter()
        .map(|(cat, items)| (*cat, items.len()))
        .collect();

    DocumentsView {
        statistics: Statistics {
            total_files: records.len(),
            total_size: records.iter().map(|r| r.size_bytes).sum(),
            by_category: counts,
            last_updated: now_iso(),
        },
        files: records.iter().take(MAX_LISTED_FILES).cloned().collect(),
        by_category,
    }
}

#[derive(Debug, Serialize)]
pub struct TimelineView {
    /// `[month, entries]` pairs, most recent month first, at most twelve.
    pub entries: Vec<(String, Vec<TimelineEntry>)>,
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
pub struct TimelineEntry {
    pub filename: String,
    pub category: FileCategory,
    pub size: String,
    pub date: String,
}

pub fn timeline_view(records: &[FileRecord]) -> TimelineView {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.modified.cmp(&a.modified));

    let mut buckets: Vec<(String, Vec<TimelineEntry>)> = Vec::new();
    for record in sorted {
        let month = prefix(&record.modified, 7);
        let entry = TimelineEntry {
            filename: record.filename.clone(),
            category: record.category,
            size: record.size_human.clone(),
            date: prefix(&record.modified, 10),
        };
        match buckets.iter_mut().find(|(m, _)| *m == month) {
            Some((_, items)) => items.push(entry),
            None => buckets.push((month, vec![entry])),
        }
    }
    buckets.truncate(MAX_TIMELINE_MONTHS);

    TimelineView {
        entries: buckets,
        last_updated: now_iso(),
    }
}

#[derive(Debug, Serialize)]
pub struct SearchEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub category: FileCategory,
    pub tags: std::collections::BTreeSet<String>,
    pub path: String,
}

pub fn search_index(records: &[FileRecord]) -> Vec<SearchEntry> {
    records
        .iter()
        .map(|r| SearchEntry {
            name: r.filename.clone(),
            category: r.category,
            tags: r.tags.clone(),
            path: r.public_url.clone(),
        })
        .collect()
}

pub fn search_index_from_evidence(records: &[EvidenceRecord]) -> Vec<SearchEntry> {
    records
        .iter()
        .map(|r| SearchEntry {
            name: r.name.clone(),
            category: r.category,
            tags: r.tags.clone(),
            path: r.path.clone(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ManifestView {
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub relative_path: String,
    pub collection_name: String,
    pub file_type: FileCategory,
    pub last_modified: String,
}

pub fn manifest_view(records: &[FileRecord]) -> ManifestView {
    ManifestView {
        files: records
            .iter()
            .map(|r| ManifestEntry {
                filename: r.filename.clone(),
                relative_path: r.public_url.clone(),
                collection_name: r.collection.clone(),
                file_type: r.category,
                last_modified: r.modified.clone(),
            })
            .collect(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasterArchive {
    pub records: Vec<EvidenceRecord>,
}

pub fn master_archive(records: &[FileRecord]) -> MasterArchive {
    MasterArchive {
        records: records
            .iter()
            .enumerate()
            .map(|(index, r)| evidence_record(r, index))
            .collect(),
    }
}

fn evidence_record(record: &FileRecord, index: usize) -> EvidenceRecord {
    let id_prefix: String = record
        .collection
        .chars()
        .take(3)
        .collect::<String>()
        .to_uppercase();
    EvidenceRecord {
        id: format!("EVD-{id_prefix}-{index:04}"),
        name: record.filename.clone(),
        path: record.public_url.clone(),
        collection: record.collection.clone(),
        category: record.category,
        date: prefix(&record.modified, 10),
        description: format!("Recovered from {}", record.collection),
        source: record.source,
        tags: record.tags.clone(),
    }
}

/// Writes all five views; returns the paths written, in write order.
pub fn write_views(
    records: &[FileRecord],
    data_dir: &Path,
    site_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    fs::create_dir_all(site_dir)
        .with_context(|| format!("creating site dir {}", site_dir.display()))?;

    let targets = [
        (data_dir.join(DOCUMENTS_FILE), to_json(&documents_view(records), true)?),
        (data_dir.join(TIMELINE_FILE), to_json(&timeline_view(records), true)?),
        (data_dir.join(SEARCH_INDEX_FILE), to_json(&search_index(records), false)?),
        (site_dir.join(MANIFEST_FILE), to_json(&manifest_view(records), false)?),
        (data_dir.join(MASTER_ARCHIVE_FILE), to_json(&master_archive(records), false)?),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (path, bytes) in targets {
        write_atomic(&path, &bytes)?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> anyhow::Result<()> {
    write_atomic(path, &to_json(value, pretty)?)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<Vec<u8>> {
    Ok(if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}

fn prefix(text: &str, len: usize) -> String {
    text.get(..len).unwrap_or(text).to_string()
}

fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentHash, SourceCategory};
    use std::collections::BTreeSet;

    fn record(filename: &str, category: FileCategory, modified: &str, collection: &str) -> FileRecord {
        FileRecord {
            filename: filename.to_string(),
            path: format!("/archive/{collection}/{filename}"),
            extension: String::new(),
            category,
            size_bytes: 10,
            size_human: "10.0 B".to_string(),
            created: modified.to_string(),
            modified: modified.to_string(),
            hash: ContentHash::Digest("00000000".to_string()),
            canonical_path: format!("archive/{collection}/{filename}"),
            collection: collection.to_string(),
            public_url: format!("https://b/archive/{collection}/{filename}"),
            tags: BTreeSet::new(),
            source: SourceCategory::ArchiveDefault,
        }
    }

    #[test]
    fn documents_view_counts_and_caps() {
        let records: Vec<FileRecord> = (0..1500)
            .map(|i| {
                record(
                    &format!("f{i}.pdf"),
                    FileCategory::Document,
                    "2021-01-01T00:00:00",
                    "c",
                )
            })
            .collect();
        let view = documents_view(&records);
        assert_eq!(view.statistics.total_files, 1500);
        assert_eq!(view.statistics.total_size, 15000);
        assert_eq!(view.statistics.by_category["document"], 1500);
        assert_eq!(view.files.len(), 1000);
        assert_eq!(view.by_category["document"].len(), 1500);
    }

    #[test]
    fn timeline_caps_at_twelve_months_descending() {
        let mut records = Vec::new();
        for month in 1..=12 {
            records.push(record(
                &format!("a{month}"),
                FileCategory::Text,
                &format!("2021-{month:02}-05T10:00:00"),
                "c",
            ));
        }
        for month in 1..=3 {
            records.push(record(
                &format!("b{month}"),
                FileCategory::Text,
                &format!("2022-{month:02}-05T10:00:00"),
                "c",
            ));
        }
        let view = timeline_view(&records);
        assert_eq!(view.entries.len(), 12);
        assert_eq!(view.entries[0].0, "2022-03");
        assert_eq!(view.entries.last().unwrap().0, "2021-04");
        let months: Vec<&String> = view.entries.iter().map(|(m, _)| m).collect();
        let mut sorted = months.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(months, sorted);
    }

    #[test]
    fn master_archive_ids_are_positional() {
        let records = vec![
            record("one.pdf", FileCategory::Document, "2020-03-01T00:00:00", "usvi"),
            record("two.jpg", FileCategory::Image, "2020-03-02T00:00:00", "estate"),
            record("three.txt", FileCategory::Text, "2020-03-03T00:00:00", "x"),
        ];
        let archive = master_archive(&records);
        let ids: Vec<&str> = archive.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["EVD-USV-0000", "EVD-EST-0001", "EVD-X-0002"]);
        assert_eq!(archive.records[0].description, "Recovered from usvi");
        assert_eq!(archive.records[0].date, "2020-03-01");
    }

    #[test]
    fn atomic_write_leaves_no_tmp_residue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &serde_json::json!({"ok": true}), false).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn search_index_serializes_minified_shape() {
        let mut rec = record("a.pdf", FileCategory::Document, "2020-01-01T00:00:00", "c");
        rec.tags.insert("pdf".to_string());
        let json = serde_json::to_string(&search_index(&[rec])).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"a.pdf","type":"document","tags":["pdf"],"path":"https://b/archive/c/a.pdf"}]"#
        );
    }
}
