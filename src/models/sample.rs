use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker that identifies a filesystem snapshot rather than a live export.
pub const SNAPSHOT_MARKER: &str = ".snapshot";

pub fn is_snapshot_mount(mount: &str) -> bool {
    mount.contains(SNAPSHOT_MARKER)
}

/// One timestamped reading of used bytes per NFS mount.
///
/// `total` is stored alongside the per-mount values and always equals their
/// sum for samples built through [`Sample::new`] or [`Sample::without_snapshots`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix seconds
    pub timestamp: i64,
    /// mount path → used bytes, iterated in path order
    pub mounts:    BTreeMap<String, i64>,
    pub total:     i64,
}

/// All samples recorded so far, oldest first.
pub type History = Vec<Sample>;

impl Sample {
    pub fn new(timestamp: i64, mounts: BTreeMap<String, i64>) -> Self {
        let total = mounts.values().fold(0i64, |acc, b| acc.saturating_add(*b));
        Self { timestamp, mounts, total }
    }

    /// Copy of this sample with `.snapshot` mounts dropped and the total recomputed.
    /// Older history files may still carry them.
    pub fn without_snapshots(&self) -> Self {
        let mounts = self.mounts.iter()
            .filter(|(mount, _)| !is_snapshot_mount(mount))
            .map(|(mount, bytes)| (mount.clone(), *bytes))
            .collect();
        Self::new(self.timestamp, mounts)
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounts(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(m, b)| (m.to_string(), *b)).collect()
    }

    #[test]
    fn new_sums_total() {
        let s = Sample::new(10, mounts(&[("/mnt/a", 100), ("/mnt/b", 250)]));
        assert_eq!(s.total, 350);
        assert_eq!(Sample::new(10, BTreeMap::new()).total, 0);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let s = Sample::new(1, mounts(&[("/mnt/a", i64::MAX), ("/mnt/b", 10)]));
        assert_eq!(s.total, i64::MAX);
    }

    #[test]
    fn snapshot_detection_is_a_substring_match() {
        assert!(is_snapshot_mount("/mnt/nfs1.snapshot"));
        assert!(is_snapshot_mount("/mnt/nfs1/.snapshot/hourly.0"));
        assert!(!is_snapshot_mount("/mnt/nfs1"));
        assert!(!is_snapshot_mount("/mnt/snapshot"));
    }

    #[test]
    fn without_snapshots_drops_entries_and_recomputes_total() {
        // total written by hand, as an old history file would have it
        let stale = Sample {
            timestamp: 42,
            mounts: mounts(&[("/mnt/a", 100), ("/mnt/a/.snapshot", 40), ("/mnt/b.snapshot", 7)]),
            total: 147,
        };
        let filtered = stale.without_snapshots();
        assert_eq!(filtered.timestamp, 42);
        assert_eq!(filtered.mounts, mounts(&[("/mnt/a", 100)]));
        assert_eq!(filtered.total, 100);
        assert!(filtered.total <= stale.total);
        assert_eq!(filtered.total, filtered.mounts.values().sum::<i64>());
    }

    #[test]
    fn without_snapshots_is_identity_when_nothing_matches() {
        let s = Sample::new(1, mounts(&[("/mnt/a", 5), ("/mnt/b", 6)]));
        assert_eq!(s.without_snapshots(), s);
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let s = Sample::new(1_700_000_000, mounts(&[("/mnt/a", 1024)]));
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["timestamp"], 1_700_000_000);
        assert_eq!(v["mounts"]["/mnt/a"], 1024);
        assert_eq!(v["total"], 1024);
    }
}
