use anyhow::ensure;
use archive_core::config::ScanConfig;
use std::path::PathBuf;

/// A root given on the command line wins; otherwise fall back to the
/// configured `scan.include` list.
pub fn effective_roots(cli_root: Option<PathBuf>, scan: &ScanConfig) -> anyhow::Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = match cli_root {
        Some(root) => vec![root],
        None => scan.include.iter().map(PathBuf::from).collect(),
    };
    ensure!(
        !roots.is_empty(),
        "no root given and scan.include is empty in the config"
    );
    Ok(roots)
}
