use crate::config::AppConfig;
use crate::{classifier, resolver, scanner, tagger, views};
use crate::models::FileRecord;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;


pub struct PipelineSummary {
    pub discovered: usize,
    pub views_written: Vec<PathBuf>,
}

/// Full run: scan the roots, enrich each record inline as it arrives, then
/// materialize all five views. Every run recomputes everything; there is no
/// incremental state between runs.
pub async fn run_scan(cfg: &AppConfig, roots: &[PathBuf]) -> anyhow::Result<PipelineSummary> {
    info!("Starting scan of {} root(s)", roots.len());
    let records = scan_and_enrich(cfg, roots).await?;
    info!("Scan complete. Discovered {} files.", records.len());

    let views_written = views::write_views(
        &records,
        Path::new(&cfg.output.data_dir),
        Path::new(&cfg.output.site_dir),
    )
    .context("writing views")?;
    info!("Wrote {} views.", views_written.len());

    Ok(PipelineSummary {
        discovered: records.len(),
        views_written,
    })
}

/// Scans and enriches without writing any output. Record order is the scan
/// order (roots in the given order), which the master-archive view turns
/// into positional ids.
pub async fn scan_and_enrich(cfg: &AppConfig, roots: &[PathBuf]) -> anyhow::Result<Vec<FileRecord>> {
    let mut stream = scanner::scan(
        roots.to_vec(),
        &cfg.scan.exclude,
        &cfg.taxonomy.categories,
    )?;

    let mut records = Vec::new();
    while let Some(mut record) = stream.rx.recv().await {
        let resolved = resolver::resolve(&record.path, &cfg.output.bucket_url);
        record.canonical_path = resolved.canonical_path;
        record.collection = resolved.collection;
        record.public_url = resolved.public_url;
        record.tags = tagger::tags_for(&record.filename, &record.collection, &cfg.taxonomy);
        record.source = classifier::classify(
            &record.collection,
            &record.filename,
            &cfg.taxonomy.source_rules,
        );
        records.push(record);
    }
    stream.handle.await?;
    Ok(records)
}
