//! Walks the evidence tree, computing metadata and content digests per file.

use crate::models::{ContentHash, FileCategory, FileRecord, DEFAULT_COLLECTION};
use chrono::{DateTime, Local};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::mpsc;
use tokio::task;
use tracing::warn;
use walkdir::WalkDir;

const HASH_CHUNK_BYTES: usize = 64 * 1024;
/// Files at or above this size get the sentinel hash instead of being read.
pub const LARGE_FILE_BYTES: u64 = 100_000_000;

pub struct ScanStream {
    pub handle: task::JoinHandle<()>,
    pub rx: mpsc::Receiver<FileRecord>,
}

/// Spawns a blocking walker over the roots and streams one record per
/// regular file. Traversal is sorted by file name so record order (and the
/// positional ids derived from it) is stable across runs over the same tree.
pub fn scan(
    roots: Vec<PathBuf>,
    excludes: &[String],
    categories: &BTreeMap<String, FileCategory>,
) -> anyhow::Result<ScanStream> {
    let (tx, rx) = mpsc::channel(100);
    let exclude_set = build_globset(excludes)?;
    let categories = categories.clone();

    let handle = task::spawn_blocking(move || {
        for root in roots {
            for entry in WalkDir::new(&root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !exclude_set.is_match(e.path()))
            {
                let entry = match entry {
                    Ok(e) => e,
                    Err(err) => {
                        warn!("walk error: {err}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let record = match read_record(entry.path(), &categories) {
                    Ok(r) => r,
                    Err(err) => {
                        warn!("skipping {}: {err}", entry.path().display());
                        continue;
                    }
                };

                if tx.blocking_send(record).is_err() {
                    // Receiver dropped, stop walking.
                    return;
                }
            }
        }
    });

    Ok(ScanStream { handle, rx })
}

fn read_record(
    path: &Path,
    categories: &BTreeMap<String, FileCategory>,
) -> anyhow::Result<FileRecord> {
    let meta = fs::metadata(path)?;
    let size = meta.len();
    let extension = extension_of(path);
    let modified = meta.modified()?;
    let created = meta.created().unwrap_or(modified);

    Ok(FileRecord {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_string_lossy().into_owned(),
        category: categories
            .get(&extension)
            .copied()
            .unwrap_or(FileCategory::Other),
        extension,
        size_bytes: size,
        size_human: format_size(size),
        created: format_timestamp(created),
        modified: format_timestamp(modified),
        hash: content_hash(path, size)?,
        canonical_path: path.to_string_lossy().into_owned(),
        collection: DEFAULT_COLLECTION.to_string(),
        public_url: String::new(),
        tags: BTreeSet::new(),
        source: Default::default(),
    })
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Streams the file through md5 in fixed-size chunks and keeps the first 8
/// hex characters. Memory stays bounded regardless of file size.
fn content_hash(path: &Path, size: u64) -> anyhow::Result<ContentHash> {
    use std::io::Read;

    if size >= LARGE_FILE_BYTES {
        return Ok(ContentHash::LargeFile);
    }
    let mut file = fs::File::open(path)?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; HASH_CHUNK_BYTES];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    let hex = format!("{:x}", ctx.compute());
    Ok(ContentHash::Digest(hex[..8].to_string()))
}

pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}
