//! Re-derives tags and source categories for an existing master archive and
//! rebuilds the search index from it, without rescanning the filesystem.

use crate::config::Taxonomy;
use crate::{classifier, tagger, views};
use crate::views::MasterArchive;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("master archive not found at {path}")]
    MissingMaster { path: PathBuf },
    #[error("reading master archive at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing master archive at {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_master(data_dir: &Path) -> Result<(PathBuf, MasterArchive), PatchError> {
    let path = data_dir.join(views::MASTER_ARCHIVE_FILE);
    let raw = fs::read_to_string(&path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            PatchError::MissingMaster { path: path.clone() }
        } else {
            PatchError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;
    let master = serde_json::from_str(&raw).map_err(|source| PatchError::Malformed {
        path: path.clone(),
        source,
    })?;
    Ok((path, master))
}

/// Aborts cleanly when the master archive is missing or unreadable; nothing
/// is overwritten in that case.
pub fn patch(data_dir: &Path, tax: &Taxonomy) -> anyhow::Result<usize> {
    let (master_path, mut master) = load_master(data_dir)?;
    info!("Patching {} records", master.records.len());

    for record in &mut master.records {
        record.source = classifier::classify(&record.collection, &record.name, &tax.source_rules);
        record.tags = tagger::tags_for(&record.name, &record.collection, tax);
    }

    views::write_json(&master_path, &master, false)?;
    views::write_json(
        &data_dir.join(views::SEARCH_INDEX_FILE),
        &views::search_index_from_evidence(&master.records),
        false,
    )?;
    Ok(master.records.len())
}
