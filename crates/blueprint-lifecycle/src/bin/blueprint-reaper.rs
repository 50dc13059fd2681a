//! `blueprint-reaper`: runs the lifecycle jobs once and prints a JSON report.
//!
//! Meant to be invoked by an external scheduler (cron, systemd timer). Exits
//! non-zero when a run fails; the failed run has rolled back.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use blueprint_core::constants::VERSION;
use blueprint_core::tracing_setup::init_tracing;
use blueprint_core::{BlueprintResult, LifecycleConfig};
use blueprint_lifecycle::{LifecycleEngine, ReaperJob};

/// Lifecycle reaper for published blueprints.
#[derive(Parser, Debug)]
#[command(name = "blueprint-reaper", version = VERSION, about, long_about = None)]
struct Cli {
    /// Config file (default: ./blueprint.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Evaluate retention windows at this RFC 3339 instant instead of the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Purge soft-deleted and expired artifacts with their versions, comments and blobs
    Artifacts,
    /// Delete sessions past the session TTL
    Sessions,
    /// Delete unconfirmed accounts past the grace period
    Accounts,
    /// Soft-delete private artifacts owned by the anonymous sentinel account
    Anonymous,
    /// Run every reaper once, continuing past failures
    All,
    /// Count what each reaper would act on, without writing
    Pending,
    /// Rebuild every account's usage aggregates
    Reconcile,
    /// Show the most recent runs from the ledger
    Runs {
        /// Only runs of this reaper
        #[arg(long)]
        reaper: Option<String>,

        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match LifecycleConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let engine = match LifecycleEngine::open(&config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, db_path = %config.storage.db_path, "cannot open database");
            return ExitCode::FAILURE;
        }
    };

    let now = cli.now.unwrap_or_else(Utc::now);
    match execute(&engine, cli.command, now) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when `all` had at least one failing reaper.
fn execute(engine: &LifecycleEngine, command: Command, now: DateTime<Utc>) -> BlueprintResult<bool> {
    match command {
        Command::Artifacts => print(&engine.run(ReaperJob::Artifacts, now)?),
        Command::Sessions => print(&engine.run(ReaperJob::Sessions, now)?),
        Command::Accounts => print(&engine.run(ReaperJob::Accounts, now)?),
        Command::Anonymous => print(&engine.run(ReaperJob::Anonymous, now)?),
        Command::Pending => print(&engine.pending(now)?),
        Command::Reconcile => print(&engine.reconcile_all_aggregates()?),
        Command::Runs { reaper, limit } => print(&engine.recent_runs(reaper.as_deref(), limit)?),
        Command::All => {
            let mut ok = true;
            let mut reports = Vec::new();
            for (job, result) in engine.run_all(now) {
                match result {
                    Ok(report) => reports.push(serde_json::to_value(&report).unwrap_or_default()),
                    Err(e) => {
                        tracing::error!(reaper = %job, error = %e, "reaper failed");
                        reports.push(serde_json::json!({
                            "reaper": job.as_str(),
                            "error": e.to_string(),
                        }));
                        ok = false;
                    }
                }
            }
            print(&reports);
            return Ok(ok);
        }
    }
    Ok(true)
}

fn print<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "cannot serialize report"),
    }
}
