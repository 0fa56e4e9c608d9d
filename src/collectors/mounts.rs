use crate::models::sample::is_snapshot_mount;
use anyhow::{Context, Result};
use std::path::Path;

pub const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";

/// Filesystem types sampled when the config doesn't say otherwise.
pub const DEFAULT_FS_TYPES: &[&str] = &["nfs", "nfs4"];

/// One line of the mount table, only the fields we look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device:  String,
    pub mount:   String,
    pub fs_type: String,
}

pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    let mut v = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 { continue; }
        v.push(MountEntry {
            device:  fields[0].to_string(),
            mount:   fields[1].to_string(),
            fs_type: fields[2].to_string(),
        });
    }
    v
}

/// Keep mounts of one of `fs_types` that aren't snapshots, in table order.
pub fn select_nfs_mounts(entries: &[MountEntry], fs_types: &[String]) -> Vec<String> {
    entries.iter()
        .filter(|e| fs_types.iter().any(|t| *t == e.fs_type))
        .filter(|e| !is_snapshot_mount(&e.mount))
        .map(|e| e.mount.clone())
        .collect()
}

/// Read the mount table at `table` and return the NFS mount points to sample.
pub fn discover(table: &Path, fs_types: &[String]) -> Result<Vec<String>> {
    // Unrelated mounts may carry non-UTF-8 paths; they must not sink the NFS ones.
    let bytes = std::fs::read(table)
        .with_context(|| format!("failed to read mount table {}", table.display()))?;
    let entries = parse_mount_table(&String::from_utf8_lossy(&bytes));
    for e in entries.iter().filter(|e| is_snapshot_mount(&e.mount)) {
        tracing::debug!(device = %e.device, mount = %e.mount, "skipping snapshot mount");
    }
    let mounts = select_nfs_mounts(&entries, fs_types);
    tracing::debug!(total = entries.len(), selected = mounts.len(), "parsed mount table");
    Ok(mounts)
}
