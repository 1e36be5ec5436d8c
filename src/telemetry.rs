//! Disk usage diagnostics emitted after an upload.
//!
//! Purely informational: nothing here can change the outcome of a run.

use std::path::{Path, PathBuf};

use sysinfo::Disks;
use tracing::{debug, info};

/// Space on the filesystem holding an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl DiskUsage {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }

    /// Used space as a percentage of the total
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes() as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Pick the disk whose mount point is the longest prefix of `path`
pub fn select_disk<'a>(path: &Path, disks: &'a [DiskUsage]) -> Option<&'a DiskUsage> {
    disks
        .iter()
        .filter(|d| path.starts_with(&d.mount_point))
        .max_by_key(|d| d.mount_point.components().count())
}

/// Snapshot of all mounted disks
pub fn list_disks() -> Vec<DiskUsage> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .map(|disk| DiskUsage {
            mount_point: disk.mount_point().to_path_buf(),
            total_bytes: disk.total_space(),
            available_bytes: disk.available_space(),
        })
        .collect()
}

/// Log the artifact size and the usage of the disk it lives on
pub fn report_disk_usage(artifact_path: &Path, artifact_bytes: u64) -> Option<DiskUsage> {
    let disks = list_disks();
    let Some(disk) = select_disk(artifact_path, &disks).cloned() else {
        debug!(path = %artifact_path.display(), "no disk found for artifact");
        return None;
    };

    info!(
        artifact = %artifact_path.display(),
        artifact_size = %format_size(artifact_bytes),
        mount_point = %disk.mount_point.display(),
        total = %format_size(disk.total_bytes),
        available = %format_size(disk.available_bytes),
        "disk usage: {:.1}% used",
        disk.used_percent()
    );
    Some(disk)
}

/// Format a byte count the way `df -h` does, e.g. "1.5G"
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{}{}", bytes, UNITS[0])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}
