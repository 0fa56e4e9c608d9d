mod collectors;
mod config;
mod error;
mod models;
mod util;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use collectors::df::{self, ByteUsageQuerier, DfQuerier};
use collectors::mounts;
use config::{Config, RunConfig};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use util::{history, report};

#[derive(Parser, Debug)]
#[command(name = "nfsusage", about = "Record NFS mount usage and compare it with the oldest sample", version = "0.1")]
struct Cli {
    /// Path to JSON file for storing usage data (default: ./nfsusage.json)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Compare current usage with the oldest recorded entry
    #[arg(short, long)]
    compare: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

/// What a run produced for stdout.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    NoMounts,
    Report(String),
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "nfsusage", &mut io::stdout());
        return ExitCode::SUCCESS;
    }
    if cli.config {
        run_print_config();
        return ExitCode::SUCCESS;
    }

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Rewrite Go-style `-file`, `-file=PATH`, `-compare` and `-compare=BOOL` (also
/// `-c=BOOL`, `--compare=BOOL`) to what clap accepts, so existing cron lines keep
/// working. Clap would otherwise read `-file` as `-f ile`. A false boolean drops the flag.
fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .filter_map(|arg| {
            let s = match arg.to_str() {
                Some(s) => s.to_owned(),
                None    => return Some(arg),
            };
            if s == "-file" || s == "-compare" || s.starts_with("-file=") {
                return Some(OsString::from(format!("-{}", s)));
            }
            let value = ["-compare=", "--compare=", "-c="].iter().find_map(|p| s.strip_prefix(p));
            match value.map(parse_go_bool) {
                Some(Some(true))  => Some(OsString::from("--compare")),
                Some(Some(false)) => None,
                _                 => Some(arg),
            }
        })
        .collect()
}

/// Boolean spellings accepted by Go's flag package.
fn parse_go_bool(v: &str) -> Option<bool> {
    match v {
        "1" | "t" | "T" | "true" | "TRUE" | "True"     => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False"  => Some(false),
        _ => None,
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Error getting current directory")?;
    let cfg = Config::load();
    let rc = RunConfig::resolve(cli.file, cli.compare, &cfg, &cwd);
    tracing::debug!(?rc, "resolved run config");

    let querier = DfQuerier::new(rc.df_command.clone());
    let now = chrono::Utc::now().timestamp();

    match run(&rc, &querier, now)? {
        Outcome::NoMounts => tracing::info!("No NFS mounts found"),
        Outcome::Report(text) => print!("{}", text),
    }
    Ok(())
}

/// Discover, sample, persist, then render. Returns the text destined for stdout.
fn run(rc: &RunConfig, querier: &dyn ByteUsageQuerier, now: i64) -> Result<Outcome> {
    let nfs_mounts = mounts::discover(&rc.mount_table, &rc.fs_types)
        .context("Error getting NFS mounts")?;
    if nfs_mounts.is_empty() {
        return Ok(Outcome::NoMounts);
    }

    let current = df::take_sample(querier, &nfs_mounts, now);
    if current.is_empty() {
        tracing::warn!("none of {} NFS mount(s) could be sampled", nfs_mounts.len());
    }

    let mut entries = history::load(&rc.history_file).context("Error loading existing data")?;
    history::append(&mut entries, current.clone());
    history::save(&rc.history_file, &entries).context("Error saving data")?;

    if rc.compare && entries.len() > 1 {
        let oldest = entries[0].without_snapshots();
        tracing::debug!(
            "comparing against sample from {} ({} samples recorded)",
            fmt_timestamp(oldest.timestamp),
            entries.len(),
        );
        return Ok(Outcome::Report(report::render_comparison(&oldest, &current)));
    }
    Ok(Outcome::Report(report::render_current(&current)))
}

fn fmt_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None     => ts.to_string(),
    }
}

fn run_print_config() {
    let cfg = Config::load();
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let history_file = if cfg.general.history_file.is_empty() {
        format!("(cwd)/{}", history::DEFAULT_FILE_NAME)
    } else {
        cfg.general.history_file.clone()
    };
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  history_file = {}", history_file);
    println!();
    println!("[mounts]");
    println!("  table    = {}", cfg.mounts.table);
    println!("  fs_types = {:?}", cfg.mounts.fs_types);
    println!();
    println!("[sampler]");
    println!("  df_command = {}", cfg.sampler.df_command);
}
