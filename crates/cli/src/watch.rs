//! Watch mode: new-file notifications feed a bounded queue consumed by a
//! single worker, so a burst of creations coalesces into one full rebuild
//! instead of racing rebuilds over the same output files.

use anyhow::Result;
use archive_core::config::AppConfig;
use archive_core::pipeline;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

pub async fn watch_roots(cfg: AppConfig, roots: Vec<PathBuf>) -> Result<()> {
    let (tx, rx) = mpsc::channel::<PathBuf>(cfg.watch.queue_capacity);

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, EventKind::Create(_)) {
                return;
            }
            for path in event.paths {
                if path.is_file() {
                    // A full queue means a rebuild is already pending; that
                    // rebuild rescans everything, so dropping here is safe.
                    let _ = tx.try_send(path);
                }
            }
        },
        notify::Config::default().with_poll_interval(Duration::from_secs(2)),
    )?;
    for root in &roots {
        let mode = if root.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(root, mode)?;
    }

    println!("Watching {} path(s)...", roots.len());
    rebuild_worker(&cfg, &roots, rx).await
}

async fn rebuild_worker(
    cfg: &AppConfig,
    roots: &[PathBuf],
    mut rx: mpsc::Receiver<PathBuf>,
) -> Result<()> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    while let Some(first) = rx.recv().await {
        let mut burst = vec![first];
        while let Ok(next) = rx.try_recv() {
            burst.push(next);
        }
        if register_burst(&mut seen, burst) == 0 {
            continue;
        }
        if let Err(err) = pipeline::run_scan(cfg, roots).await {
            warn!("rebuild failed: {err:#}");
        }
    }
    Ok(())
}

/// Folds a burst of notifications into the seen set, returning how many paths
/// were new. The set lives for the process only; restarts start fresh.
pub fn register_burst(
    seen: &mut HashSet<PathBuf>,
    paths: impl IntoIterator<Item = PathBuf>,
) -> usize {
    paths.into_iter().filter(|p| seen.insert(p.clone())).count()
}
