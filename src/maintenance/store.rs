// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maintenance content store.
//!
//! Holds the process-wide maintenance flag and page content, persists the
//! pair on every mutation and notifies subscribers through a `watch` channel.
//! Handlers receive the store through `AppState`; nothing looks it up
//! globally.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use utoipa::ToSchema;

use super::content::{MaintenanceContent, MaintenanceContentPatch};
use crate::storage::{FileStorage, StorageResult};

/// The persisted maintenance record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceState {
    #[serde(default)]
    pub is_maintenance_mode: bool,
    #[serde(default)]
    pub content: MaintenanceContent,
}

/// Durable home of the [`MaintenanceState`] record.
pub trait StateBackend: Send + Sync {
    /// Load the record. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> StorageResult<Option<MaintenanceState>>;

    /// Replace the stored record.
    fn save(&self, state: &MaintenanceState) -> StorageResult<()>;
}

/// Stores the record as `maintenance/state.json` under the data directory.
pub struct FileStateBackend {
    storage: Arc<FileStorage>,
}

impl FileStateBackend {
    pub fn new(storage: Arc<FileStorage>) -> Self {
        Self { storage }
    }
}

impl StateBackend for FileStateBackend {
    fn load(&self) -> StorageResult<Option<MaintenanceState>> {
        self.storage
            .read_json_opt(self.storage.paths().maintenance_state())
    }

    fn save(&self, state: &MaintenanceState) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().maintenance_state(), state)
    }
}

/// Keeps nothing; the store lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStateBackend;

impl StateBackend for MemoryStateBackend {
    fn load(&self) -> StorageResult<Option<MaintenanceState>> {
        Ok(None)
    }

    fn save(&self, _state: &MaintenanceState) -> StorageResult<()> {
        Ok(())
    }
}

struct Inner {
    tx: watch::Sender<MaintenanceState>,
    backend: Box<dyn StateBackend>,
}

/// Shared handle to the maintenance record.
///
/// Mutations never fail from the caller's point of view: a failed write is
/// logged and the in-memory state stays authoritative.
#[derive(Clone)]
pub struct MaintenanceStore {
    inner: Arc<Inner>,
}

impl MaintenanceStore {
    /// Rehydrate from `backend`.
    ///
    /// A missing record starts from defaults and writes them; an unreadable
    /// record starts from defaults and leaves the file for inspection.
    pub fn load(backend: impl StateBackend + 'static) -> Self {
        let state = match backend.load() {
            Ok(Some(state)) => {
                tracing::info!(
                    maintenance_mode = state.is_maintenance_mode,
                    "Loaded persisted maintenance state"
                );
                state
            }
            Ok(None) => {
                let state = MaintenanceState::default();
                if let Err(e) = backend.save(&state) {
                    tracing::warn!(error = %e, "Failed to persist default maintenance state");
                }
                state
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Persisted maintenance state is unreadable, falling back to defaults"
                );
                MaintenanceState::default()
            }
        };

        let (tx, _rx) = watch::channel(state);
        Self {
            inner: Arc::new(Inner {
                tx,
                backend: Box::new(backend),
            }),
        }
    }

    /// A store without durable storage.
    pub fn in_memory() -> Self {
        Self::load(MemoryStateBackend)
    }

    /// Current snapshot.
    pub fn get(&self) -> MaintenanceState {
        self.inner.tx.borrow().clone()
    }

    /// Current mode flag, without cloning the content.
    pub fn is_enabled(&self) -> bool {
        self.inner.tx.borrow().is_maintenance_mode
    }

    /// Set the mode flag. Persists even when the value is unchanged.
    pub fn set_mode(&self, enabled: bool) {
        self.mutate(|state| state.is_maintenance_mode = enabled);
        tracing::info!(maintenance_mode = enabled, "Maintenance mode set");
    }

    /// Shallow-merge `patch` into the content.
    pub fn update_content(&self, patch: MaintenanceContentPatch) {
        self.mutate(|state| state.content.apply(patch));
    }

    /// Restore the default content. The mode flag is left as is.
    pub fn reset_to_defaults(&self) {
        self.mutate(|state| state.content = MaintenanceContent::default());
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<MaintenanceState> {
        self.inner.tx.subscribe()
    }

    // The write happens inside send_modify so the persisted order matches
    // the mutation order when two writers race.
    fn mutate(&self, f: impl FnOnce(&mut MaintenanceState)) {
        let backend = &self.inner.backend;
        self.inner.tx.send_modify(|state| {
            f(state);
            if let Err(e) = backend.save(state) {
                tracing::warn!(error = %e, "Failed to persist maintenance state");
            }
        });
    }
}

impl Default for MaintenanceStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::content::SocialLinksPatch;
    use crate::storage::{StorageError, StoragePaths};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn file_backend(temp: &TempDir) -> FileStateBackend {
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        FileStateBackend::new(Arc::new(storage))
    }

    #[derive(Default, Clone)]
    struct CountingBackend {
        saves: Arc<AtomicUsize>,
    }

    impl StateBackend for CountingBackend {
        fn load(&self) -> StorageResult<Option<MaintenanceState>> {
            Ok(Some(MaintenanceState::default()))
        }

        fn save(&self, _state: &MaintenanceState) -> StorageResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenBackend;

    impl StateBackend for BrokenBackend {
        fn load(&self) -> StorageResult<Option<MaintenanceState>> {
            Err(StorageError::NotInitialized)
        }

        fn save(&self, _state: &MaintenanceState) -> StorageResult<()> {
            Err(StorageError::NotInitialized)
        }
    }

    #[test]
    fn starts_with_defaults() {
        let store = MaintenanceStore::in_memory();
        let state = store.get();
        assert!(!state.is_maintenance_mode);
        assert_eq!(state.content, MaintenanceContent::default());
    }

    #[test]
    fn set_mode_round_trips_through_storage() {
        let temp = TempDir::new().unwrap();
        let store = MaintenanceStore::load(file_backend(&temp));
        store.set_mode(true);
        drop(store);

        let reloaded = MaintenanceStore::load(file_backend(&temp));
        assert!(reloaded.is_enabled());
    }

    #[test]
    fn content_updates_survive_reload() {
        let temp = TempDir::new().unwrap();
        let store = MaintenanceStore::load(file_backend(&temp));
        store.update_content(MaintenanceContentPatch {
            title: Some("Back at noon".into()),
            ..Default::default()
        });

        let reloaded = MaintenanceStore::load(file_backend(&temp));
        assert_eq!(reloaded.get().content.title, "Back at noon");
    }

    #[test]
    fn first_run_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let _store = MaintenanceStore::load(file_backend(&temp));
        assert!(temp.path().join("maintenance/state.json").exists());
    }

    #[test]
    fn corrupt_record_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let backend = file_backend(&temp);
        std::fs::write(temp.path().join("maintenance/state.json"), b"{\"isMaint").unwrap();

        let store = MaintenanceStore::load(backend);
        assert_eq!(store.get(), MaintenanceState::default());
    }

    #[test]
    fn partial_record_keeps_defaults_for_missing_fields() {
        let temp = TempDir::new().unwrap();
        let backend = file_backend(&temp);
        std::fs::write(
            temp.path().join("maintenance/state.json"),
            br#"{"isMaintenanceMode":true,"content":{"title":"Stored"}}"#,
        )
        .unwrap();

        let state = MaintenanceStore::load(backend).get();
        assert!(state.is_maintenance_mode);
        assert_eq!(state.content.title, "Stored");
        assert_eq!(state.content.mission, MaintenanceContent::default().mission);
    }

    #[test]
    fn every_mutation_persists() {
        let backend = CountingBackend::default();
        let saves = backend.saves.clone();
        let store = MaintenanceStore::load(backend);

        store.set_mode(false);
        store.set_mode(false);
        store.update_content(MaintenanceContentPatch::default());
        store.reset_to_defaults();

        assert_eq!(saves.load(Ordering::SeqCst), 4);
        assert!(!store.is_enabled());
    }

    #[test]
    fn twitter_update_preserves_other_links() {
        let store = MaintenanceStore::in_memory();
        let before = store.get().content.social_links;

        store.update_content(MaintenanceContentPatch {
            social_links: Some(SocialLinksPatch {
                twitter: Some("X".into()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let after = store.get().content.social_links;
        assert_eq!(after.twitter.as_deref(), Some("X"));
        assert_eq!(after.linkedin, before.linkedin);
        assert_eq!(after.telegram, before.telegram);
    }

    #[test]
    fn reset_restores_content_and_keeps_mode() {
        let store = MaintenanceStore::in_memory();
        store.set_mode(true);
        store.update_content(MaintenanceContentPatch {
            title: Some("Edited".into()),
            video_url: Some("https://youtu.be/abc".into()),
            ..Default::default()
        });

        store.reset_to_defaults();

        let state = store.get();
        assert!(state.is_maintenance_mode);
        assert_eq!(state.content, MaintenanceContent::default());
    }

    #[test]
    fn broken_storage_degrades_to_memory() {
        let store = MaintenanceStore::load(BrokenBackend);
        store.set_mode(true);
        store.update_content(MaintenanceContentPatch {
            subtitle: Some("still works".into()),
            ..Default::default()
        });

        let state = store.get();
        assert!(state.is_maintenance_mode);
        assert_eq!(state.content.subtitle, "still works");
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = MaintenanceStore::in_memory();
        let mut rx = store.subscribe();

        store.set_mode(true);

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_maintenance_mode);
    }
}
