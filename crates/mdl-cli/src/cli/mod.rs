//! CLI for the mdl parallel downloader.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mdl_core::config::{self, MdlConfig};
use mdl_core::control::CancelToken;
use mdl_core::retry::RetryPolicy;
use mdl_core::scheduler::{self, RunReport};
use mdl_core::task;
use mdl_core::transfer::{CurlExecutor, TransferOptions};

/// Exit code when the run is cut short by Ctrl-C (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;

/// Download many URLs concurrently with retry and resume.
#[derive(Debug, Parser)]
#[command(name = "mdl")]
#[command(about = "mdl: bounded-concurrency parallel downloader", long_about = None)]
pub struct Cli {
    /// URLs to download.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Read additional URLs from FILE, one per line; blank lines and lines
    /// starting with '#' are ignored.
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Concurrent downloads (1-50).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Additional attempts after a failed first attempt (0-10).
    #[arg(short = 'r', long, value_name = "N")]
    pub retries: Option<u32>,

    /// Per-attempt timeout in seconds (0 = no timeout).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Resume partial downloads instead of skipping existing files.
    #[arg(short = 'c', long)]
    pub resume: bool,

    /// Download rate cap, passed through to the transfer backend (e.g. "500k").
    #[arg(long, value_name = "RATE")]
    pub rate_limit: Option<String>,

    /// Destination directory (created if missing).
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dest_dir: Option<PathBuf>,
}

/// Applies CLI flags over config-file defaults. Flags win; the file only
/// supplies what the user did not say.
fn apply_overrides(cfg: &mut MdlConfig, cli: &Cli) {
    if let Some(jobs) = cli.jobs {
        cfg.jobs = jobs;
    }
    if let Some(retries) = cli.retries {
        cfg.retries = retries;
    }
    if let Some(timeout) = cli.timeout {
        cfg.timeout_secs = timeout;
    }
    if cli.rate_limit.is_some() {
        cfg.rate_limit = cli.rate_limit.clone();
    }
    if cli.resume {
        cfg.resume = true;
    }
}

/// Collects URLs in submission order: CLI positionals first, then the input
/// file if given.
fn collect_urls(cli: &Cli) -> Result<Vec<String>> {
    let mut urls = cli.urls.clone();
    if let Some(path) = &cli.input_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path.display()))?;
        urls.extend(task::parse_task_list(&text));
    }
    Ok(urls)
}

fn print_report(report: &RunReport) {
    println!(
        "completed {}  failed {}  skipped {}  (total {})",
        report.completed, report.failed, report.skipped, report.total
    );
    if report.interrupted {
        println!("run interrupted");
    }
}

/// Parses the command line, runs the scheduler, and returns the process
/// exit code: 0 on full success, 1 on any failure or validation error,
/// 130 when interrupted.
pub async fn run_from_args() -> Result<i32> {
    let cli = Cli::parse();

    let mut cfg = config::load_or_init()?;
    apply_overrides(&mut cfg, &cli);
    cfg.validate().context("invalid configuration")?;
    tracing::debug!("effective config: {:?}", cfg);

    let urls = collect_urls(&cli)?;
    if urls.is_empty() {
        bail!("no URLs given (pass them as arguments or with --input-file)");
    }

    let dest_dir = cli.dest_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("creating destination directory {}", dest_dir.display()))?;

    let (tasks, rejected) = task::build_tasks(&urls, &dest_dir);
    for err in &rejected {
        tracing::warn!("rejected task: {}", err);
        eprintln!("mdl: skipping invalid entry: {}", err);
    }
    if tasks.is_empty() {
        bail!("no valid URLs to download");
    }

    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            signal_token.cancel();
        }
    });

    let policy = RetryPolicy::from_retries(
        cfg.retries,
        Duration::from_secs_f64(cfg.base_delay_secs),
    );
    let opts = TransferOptions {
        resume: cfg.resume,
        timeout: (cfg.timeout_secs > 0).then(|| Duration::from_secs(cfg.timeout_secs)),
        rate_limit: cfg.rate_limit.clone(),
    };

    let report = scheduler::run_tasks(
        Arc::new(CurlExecutor::new()),
        tasks,
        cfg.jobs,
        policy,
        opts,
        cancel,
    )
    .await;

    print_report(&report);

    if report.interrupted {
        return Ok(EXIT_INTERRUPTED);
    }
    if !report.success() || !rejected.is_empty() {
        return Ok(1);
    }
    Ok(0)
}
