use crate::collectors::df::DEFAULT_DF_COMMAND;
use crate::collectors::mounts::{DEFAULT_FS_TYPES, DEFAULT_MOUNT_TABLE};
use crate::util::history::DEFAULT_FILE_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub mounts: MountsConfig,

    #[serde(default)]
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// History file used when --file isn't given. Empty = ./nfsusage.json
    #[serde(default)]
    pub history_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountsConfig {
    /// Mount table to scan
    pub table: String,
    /// Filesystem types that count as NFS (exact match)
    pub fs_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Program invoked as `<df_command> -B1 <mount>`
    pub df_command: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            table:    DEFAULT_MOUNT_TABLE.into(),
            fs_types: DEFAULT_FS_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { df_command: DEFAULT_DF_COMMAND.into() }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(LoadError::Missing(path)) => {
                tracing::debug!("no config at {}, using defaults", path.display());
                // Write defaults on first run (best-effort)
                let _ = try_write_defaults(&path);
                Config::default()
            }
            Err(LoadError::Other(e)) => {
                tracing::warn!("ignoring config, using defaults: {:#}", e);
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nfsusage").join("nfsusage.toml"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

enum LoadError {
    Missing(PathBuf),
    Other(anyhow::Error),
}

fn try_load() -> std::result::Result<Config, LoadError> {
    match Config::config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::debug!("no config dir, using defaults");
            Ok(Config::default())
        }
    }
}

fn load_from(path: &Path) -> std::result::Result<Config, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::Missing(path.to_path_buf())),
        Err(e) => {
            return Err(LoadError::Other(
                anyhow::Error::new(e).context(format!("failed to read {}", path.display())),
            ))
        }
    };
    Config::parse(&text)
        .with_context(|| format!("invalid config {}", path.display()))
        .map_err(LoadError::Other)
}

fn try_write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# nfsusage configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

// ── Per-run settings ──────────────────────────────────────────────────

/// Everything one invocation needs, resolved from flags, config and cwd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub history_file: PathBuf,
    pub compare:      bool,
    pub mount_table:  PathBuf,
    pub fs_types:     Vec<String>,
    pub df_command:   String,
}

impl RunConfig {
    /// `--file` wins over `[general] history_file`, which wins over `<cwd>/nfsusage.json`.
    /// Relative paths are taken relative to `cwd`.
    pub fn resolve(file: Option<PathBuf>, compare: bool, cfg: &Config, cwd: &Path) -> Self {
        let history_file = file
            .or_else(|| {
                let f = cfg.general.history_file.trim();
                (!f.is_empty()).then(|| PathBuf::from(f))
            })
            .map(|p| cwd.join(p))
            .unwrap_or_else(|| cwd.join(DEFAULT_FILE_NAME));

        Self {
            history_file,
            compare,
            mount_table: PathBuf::from(&cfg.mounts.table),
            fs_types:    cfg.mounts.fs_types.clone(),
            df_command:  cfg.sampler.df_command.clone(),
        }
    }
}
