//! Durable local persistence slot.
//!
//! The cart owns exactly one slot, keyed by a fixed namespace string. Reads
//! and writes are plain strings; the store decides what goes in them.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use thiserror::Error;

/// Fixed namespace key for the persisted cart.
pub const CART_SLOT_KEY: &str = "kilima.cart.v1";

/// Errors raised by a persistence slot.
///
/// The cart store catches and logs these; they never reach its callers.
#[derive(Debug, Error)]
pub enum CartSlotError {
    /// Underlying I/O failure.
    #[error("slot i/o error")]
    Io(#[from] io::Error),
}

/// A durable local key-value slot holding the serialized cart.
pub trait CartSlot: fmt::Debug + Send + Sync {
    /// Read the stored payload, `None` when the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns a [`CartSlotError`] when the underlying storage fails.
    fn read(&self) -> Result<Option<String>, CartSlotError>;

    /// Replace the stored payload.
    ///
    /// # Errors
    ///
    /// Returns a [`CartSlotError`] when the underlying storage fails.
    fn write(&self, payload: &str) -> Result<(), CartSlotError>;
}

/// File-backed slot: one JSON file named after [`CART_SLOT_KEY`].
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot stored inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CART_SLOT_KEY}.json")),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, CartSlotError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<(), CartSlotError> {
        fs::write(&self.path, payload)?;

        Ok(())
    }
}

/// In-memory slot for tests and ephemeral contexts.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-seeded with a payload.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(payload.into())),
        }
    }
}

impl CartSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, CartSlotError> {
        let guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(guard.clone())
    }

    fn write(&self, payload: &str) -> Result<(), CartSlotError> {
        let mut guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);

        *guard = Some(payload.to_owned());

        Ok(())
    }
}
