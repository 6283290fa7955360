// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod index;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::command::{find_references, CommandOutcome};
use crate::config::{load_for_workspace, ConfigFile, Settings};
use crate::engine::{BuildCoordinator, BuildSummary, CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the build coordinator
/// - (for `watch`) the runtime loop, file watcher, stdin queries and Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let workspace = workspace_root(args.workspace.as_deref());
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let raw = load_for_workspace(&workspace, args.config.as_deref())?
        .with_overrides(args.export_name.clone(), args.container_root.clone());
    let cfg = ConfigFile::try_from(raw)?;
    let settings = Settings::resolve(&cfg, &workspace, fs.as_ref())?;

    let coordinator = BuildCoordinator::new(settings, fs)?;

    if args.dry_run {
        print_dry_run(&coordinator);
        return Ok(());
    }

    match args.command {
        Command::Scan => run_scan(coordinator),
        Command::Find { script, names } => run_find(coordinator, &script, names),
        Command::Watch => run_watch(coordinator).await,
    }
}

fn workspace_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn run_scan(mut coordinator: BuildCoordinator) -> Result<()> {
    if let Some(summary) = coordinator.full_build() {
        print_summary(&summary);
    }
    Ok(())
}

fn run_find(mut coordinator: BuildCoordinator, script: &Path, names_only: bool) -> Result<()> {
    coordinator.full_build();
    let outcome = find_references(Some(&coordinator), script);
    if outcome.is_error() {
        anyhow::bail!("{outcome}");
    }
    print_outcome(&outcome, names_only);
    Ok(())
}

/// Build, keep the index current from the watcher, and answer one query per
/// stdin line until stdin closes or Ctrl-C.
async fn run_watch(coordinator: BuildCoordinator) -> Result<()> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);

    let router = coordinator.scanner().router();
    let _watcher_handle = crate::watch::spawn_watcher(router, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // stdin lines → queries.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let (reply_tx, reply_rx) = oneshot::channel();
                        let query = RuntimeEvent::Query {
                            active_file: PathBuf::from(line),
                            reply: reply_tx,
                        };
                        if tx.send(query).await.is_err() {
                            return;
                        }
                        match reply_rx.await {
                            Ok(outcome) => print_outcome(&outcome, false),
                            Err(_) => return,
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!("failed to read stdin: {err}");
                        break;
                    }
                }
            }
            info!("stdin closed; shutting down");
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    rt_tx.send(RuntimeEvent::BuildRequested).await?;

    let core = CoreRuntime::new(coordinator, RuntimeOptions::default());
    let runtime = Runtime::new(core, rt_rx, rt_tx);
    runtime.run().await?;
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!("Build cache complete.");
    println!("  containers scanned: {}", summary.scanned);
    println!("  containers with references: {}", summary.containers);
    println!("  distinct scripts: {}", summary.scripts);
}

fn print_outcome(outcome: &CommandOutcome, names_only: bool) {
    match outcome {
        CommandOutcome::Found(list) if names_only => {
            for item in &list.items {
                println!("{}", item.copy_name());
            }
        }
        other if other.is_error() => eprintln!("{other}"),
        other => print!("{}", with_trailing_newline(other.to_string())),
    }
}

fn with_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

/// Print resolved settings without scanning anything.
fn print_dry_run(coordinator: &BuildCoordinator) {
    let settings = coordinator.settings();
    let extractor = coordinator.scanner().extractor();
    println!("prefab-index dry-run");
    println!("  settings.export_name = {}", extractor.key());
    println!("  reference pattern = {}", extractor.pattern());
    println!("  workspace root = {}", settings.workspace_root().display());
    println!(
        "  container root = {}{}",
        settings.container_root().display(),
        if settings.container_root_is_workspace() {
            " (workspace)"
        } else {
            ""
        }
    );
    println!("  script extension = .{}", settings.script_extension());
    println!("  include = {:?}", settings.include_patterns());
    if !settings.exclude_patterns().is_empty() {
        println!("  exclude = {:?}", settings.exclude_patterns());
    }
}
