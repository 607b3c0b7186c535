//! Cart snapshot persistence.
//!
//! The cart survives reloads by writing its whole [`CartState`] after every
//! mutating transition. Stores are expected to be local and fast: a file on
//! disk, a browser cookie, or memory in tests.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

use az_clothes_core::CartState;

pub use file::FileCartStore;
pub use memory::MemoryCartStore;

/// Errors raised while reading or writing a cart snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("cart snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot exists but is not a valid cart.
    #[error("cart snapshot at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cart could not be serialized.
    #[error("failed to serialize cart snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store.
    #[error("cart store lock poisoned")]
    Poisoned,
}

/// Persistence collaborator for the cart snapshot.
pub trait CartStore: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be read or parsed.
    fn load(&self) -> Result<Option<CartState>, StoreError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be written.
    fn save(&self, snapshot: &CartState) -> Result<(), StoreError>;

    /// Forget the saved snapshot (logout).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn load(&self) -> Result<Option<CartState>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartState) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
