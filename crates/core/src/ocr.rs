//! Enriches document records in the master archive with person tags mined
//! from PDF text. Requires the `pdf` cargo feature; without it the operation
//! is a logged no-op.

use crate::config::Taxonomy;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct OcrSummary {
    /// Documents whose text was extracted and scanned.
    pub scanned: usize,
    /// Documents that gained at least one tag.
    pub tagged: usize,
}

#[cfg(feature = "pdf")]
pub fn augment(
    data_dir: &Path,
    search_roots: &[PathBuf],
    tax: &Taxonomy,
) -> anyhow::Result<OcrSummary> {
    use crate::models::FileCategory;
    use crate::{patch, views};
    use tracing::{debug, info};

    // Text beyond this is ignored; keeps scanning bounded for huge documents.
    const MAX_TEXT_CHARS: usize = 100_000;

    let (master_path, mut master) = patch::load_master(data_dir)?;
    let mut summary = OcrSummary::default();

    for record in &mut master.records {
        if record.category != FileCategory::Document
            || !record.name.to_lowercase().ends_with(".pdf")
        {
            continue;
        }
        let Some(path) = locate(&record.name, search_roots) else {
            debug!("no file on disk for {}", record.name);
            continue;
        };
        // Extraction failure leaves the record untouched.
        let Ok(text) = pdf_extract::extract_text(&path) else {
            debug!("text extraction failed for {}", path.display());
            continue;
        };
        let text: String = text.chars().take(MAX_TEXT_CHARS).collect::<String>().to_lowercase();
        summary.scanned += 1;

        let before = record.tags.len();
        for person in &tax.person_patterns {
            if person.keywords.iter().any(|p| text.contains(p.as_str())) {
                record.tags.insert(person.tag.clone());
            }
        }
        if record.tags.len() > before {
            summary.tagged += 1;
        }
    }

    views::write_json(&master_path, &master, false)?;
    views::write_json(
        &data_dir.join(views::SEARCH_INDEX_FILE),
        &views::search_index_from_evidence(&master.records),
        false,
    )?;
    info!(
        "Content tagging complete: {} scanned, {} tagged",
        summary.scanned, summary.tagged
    );
    Ok(summary)
}

#[cfg(feature = "pdf")]
fn locate(filename: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    use walkdir::WalkDir;

    for root in roots {
        for entry in WalkDir::new(root).into_iter().flatten() {
            if entry.file_type().is_file() && entry.file_name().to_string_lossy() == filename {
                return Some(entry.into_path());
            }
        }
    }
    None
}

#[cfg(not(feature = "pdf"))]
pub fn augment(
    _data_dir: &Path,
    _search_roots: &[PathBuf],
    _tax: &Taxonomy,
) -> anyhow::Result<OcrSummary> {
    tracing::warn!("built without the `pdf` feature; skipping content tagging");
    Ok(OcrSummary::default())
}
