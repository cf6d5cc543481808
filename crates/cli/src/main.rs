use anyhow::Result;
use archive_core::config;
use archive_core::pipeline;
use archive_core::{ocr, patch};
use clap::{Parser, Subcommand};
use cli::paths;
use cli::watch;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { root, output, json } => {
            if let Some(out) = output {
                cfg.output.data_dir = out;
            }
            let roots = paths::effective_roots(root, &cfg.scan)?;
            let summary = pipeline::run_scan(&cfg, &roots).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "discovered": summary.discovered,
                        "views": summary.views_written,
                    })
                );
            } else {
                println!(
                    "Indexed {} files into {} views",
                    summary.discovered,
                    summary.views_written.len()
                );
            }
            Ok(())
        }
        Commands::Watch { root, output } => {
            if let Some(out) = output {
                cfg.output.data_dir = out;
            }
            let roots = paths::effective_roots(root, &cfg.scan)?;
            watch::watch_roots(cfg, roots).await
        }
        Commands::Patch => {
            let patched = patch::patch(Path::new(&cfg.output.data_dir), &cfg.taxonomy)?;
            println!("Patched {patched} records");
            Ok(())
        }
        Commands::Ocr { roots } => {
            let summary = ocr::augment(Path::new(&cfg.output.data_dir), &roots, &cfg.taxonomy)?;
            println!(
                "Scanned {} documents, tagged {}",
                summary.scanned, summary.tagged
            );
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(name = "evidence-indexer")]
#[command(about = "Evidence archive indexer for the static dashboard", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-time scan: index a directory tree and regenerate all views
    Scan {
        /// Root directory to scan; defaults to scan.include from the config
        root: Option<PathBuf>,
        /// Override output data directory
        #[arg(long)]
        output: Option<String>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Watch a directory and rebuild all views on new files
    Watch {
        /// Root directory to watch; defaults to scan.include from the config
        root: Option<PathBuf>,
        /// Override output data directory
        #[arg(long)]
        output: Option<String>,
    },
    /// Recompute tags and source categories on the existing master archive
    Patch,
    /// Add person tags mined from PDF text to the master archive
    Ocr {
        /// Directories searched for the underlying PDF files
        #[arg(required = true)]
        roots: Vec<PathBuf>,
    },
}
