use crate::models::sample::{History, Sample};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_FILE_NAME: &str = "nfsusage.json";

/// Load every recorded sample, oldest first.
/// A missing file is an empty history; anything unreadable or malformed is an error.
pub fn load(path: &Path) -> Result<History> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no history yet");
            return Ok(History::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let history: History = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(history)
}

pub fn append(history: &mut History, sample: Sample) {
    history.push(sample);
}

/// Overwrite `path` with the whole history, pretty-printed.
pub fn save(path: &Path, history: &History) -> Result<()> {
    let json = serde_json::to_string_pretty(history)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
