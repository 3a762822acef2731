// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-disk storage layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent storage.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Maintenance Paths ==========

    /// Directory holding the maintenance record.
    pub fn maintenance_dir(&self) -> PathBuf {
        self.root.join("maintenance")
    }

    /// The single persisted maintenance record (mode flag + page content).
    pub fn maintenance_state(&self) -> PathBuf {
        self.maintenance_dir().join("state.json")
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn maintenance_paths_are_correct() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(
            paths.maintenance_dir(),
            PathBuf::from("/tmp/test-data/maintenance")
        );
        assert_eq!(
            paths.maintenance_state(),
            PathBuf::from("/tmp/test-data/maintenance/state.json")
        );
    }

    #[test]
    fn audit_paths_are_correct() {
        let paths = StoragePaths::new("/srv/portal");
        assert_eq!(paths.audit_dir(), PathBuf::from("/srv/portal/audit"));
        assert_eq!(
            paths.audit_events_file("2026-10-19"),
            PathBuf::from("/srv/portal/audit/2026-10-19/events.jsonl")
        );
    }
}
