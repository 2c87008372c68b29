//! Debounced persistence of the board.
//!
//! The manager watches the canvas revision counter. A save happens once the
//! revision has moved past the last saved one and the board has been idle for
//! the debounce window, so a burst of edits becomes one write.

use crate::canvas::Canvas;
use crate::error::Notice;
use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key the board is stored under.
pub const BOARD_KEY: &str = "whiteboard-data";

/// Which document format a save ended up writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The complete document with settings.
    Full,
    /// Layers and active layer only.
    Minimal,
}

/// Manages automatic board persistence.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    debounce: Duration,
    key: String,
    saved_revision: u64,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a manager writing to `storage` under [`BOARD_KEY`].
    pub fn new(storage: Arc<S>, debounce: Duration) -> Self {
        Self {
            storage,
            debounce,
            key: BOARD_KEY.to_string(),
            saved_revision: 0,
        }
    }

    /// Store under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether the canvas has changes newer than the last save.
    pub fn is_dirty(&self, canvas: &Canvas) -> bool {
        canvas.revision() != self.saved_revision
    }

    /// Whether a save is due at `now`.
    pub fn should_save_at(&self, canvas: &Canvas, now: Instant) -> bool {
        if !self.is_dirty(canvas) {
            return false;
        }
        match canvas.last_change() {
            Some(changed) => now.saturating_duration_since(changed) >= self.debounce,
            None => true,
        }
    }

    pub fn should_save(&self, canvas: &Canvas) -> bool {
        self.should_save_at(canvas, Instant::now())
    }

    /// Save if the canvas is dirty and idle. Returns the outcome when a save ran.
    pub async fn maybe_save(&mut self, canvas: &mut Canvas) -> StorageResult<Option<SaveOutcome>> {
        if !self.should_save(canvas) {
            return Ok(None);
        }
        self.save(canvas).await.map(Some)
    }

    /// Save now: the full document first, then the minimal one if that fails.
    ///
    /// A notice is queued on the canvas only when both writes fail.
    pub async fn save(&mut self, canvas: &mut Canvas) -> StorageResult<SaveOutcome> {
        let revision = canvas.revision();

        let full = match canvas.to_document_json() {
            Ok(json) => self.storage.save(&self.key, &json).await,
            Err(e) => Err(StorageError::Serialization(e.to_string())),
        };
        match full {
            Ok(()) => {
                log::debug!("Saved board revision {}", revision);
                self.saved_revision = revision;
                return Ok(SaveOutcome::Full);
            }
            Err(e) => log::warn!("Full save failed, trying minimal: {}", e),
        }

        let minimal = match canvas.to_minimal_json() {
            Ok(json) => self.storage.save(&self.key, &json).await,
            Err(e) => Err(StorageError::Serialization(e.to_string())),
        };
        match minimal {
            Ok(()) => {
                log::info!("Saved minimal board revision {}", revision);
                self.saved_revision = revision;
                Ok(SaveOutcome::Minimal)
            }
            Err(e) => {
                log::error!("Failed to save board: {}", e);
                canvas.push_notice(Notice::error(
                    "Error",
                    "Failed to save whiteboard. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Load the stored board into `canvas`.
    ///
    /// Returns false when nothing usable was stored; the canvas then keeps its
    /// defaults. An unreadable document also queues a notice.
    pub async fn restore(&mut self, canvas: &mut Canvas) -> StorageResult<bool> {
        let json = match self.storage.load(&self.key).await {
            Ok(json) => json,
            Err(StorageError::NotFound(_)) => return Ok(false),
            Err(e) => {
                log::error!("Failed to read saved board: {}", e);
                canvas.push_notice(Notice::error("Error", "Failed to load saved data."));
                return Err(e);
            }
        };

        let restored = match canvas.load_document_json(&json) {
            Ok(applied) => applied,
            Err(e) => {
                log::error!("Failed to load saved board: {}", e);
                canvas.push_notice(Notice::error(
                    "Error",
                    "Failed to load saved data. Starting with a fresh whiteboard.",
                ));
                false
            }
        };
        self.saved_revision = canvas.revision();
        Ok(restored)
    }

    /// Remove the stored board.
    pub async fn delete(&self) -> StorageResult<()> {
        self.storage.delete(&self.key).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Convenience type alias for platform-specific storage.
pub type PlatformStorage = crate::storage::FileStorage;

/// Type alias for the auto-save manager with platform-specific storage.
pub type PlatformAutoSaveManager = AutoSaveManager<PlatformStorage>;

/// Create a platform-appropriate storage backend.
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(PlatformStorage::default_location()?))
}

/// Create an auto-save manager with default storage and the given debounce.
pub fn create_autosave_manager(debounce: Duration) -> StorageResult<PlatformAutoSaveManager> {
    let storage = create_default_storage()?;
    Ok(AutoSaveManager::new(storage, debounce))
}
