// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent JSON storage under the data directory (`DATA_DIR`).
//!
//! ## Storage Layout
//!
//! ```text
//! ./data/
//!   maintenance/
//!     state.json           # { isMaintenanceMode, content }
//!   audit/
//!     {date}/events.jsonl  # Daily audit logs
//! ```

pub mod audit;
pub mod file_store;
pub mod paths;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use file_store::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
