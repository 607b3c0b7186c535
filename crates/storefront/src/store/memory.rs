//! In-memory cart store.

use std::sync::Mutex;

use az_clothes_core::CartState;

use super::{CartStore, StoreError};

/// Keeps the snapshot in memory. Used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: Option<CartState>,
    saves: usize,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: CartState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot: Some(snapshot),
                saves: 0,
            }),
        }
    }

    /// The currently saved snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<CartState> {
        self.inner.lock().ok().and_then(|inner| inner.snapshot.clone())
    }

    /// How many times `save` has been called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.saves).unwrap_or_default()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<CartState>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.snapshot.clone())
    }

    fn save(&self, snapshot: &CartState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.snapshot = Some(snapshot.clone());
        inner.saves += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.snapshot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let store = MemoryCartStore::new();
        assert!(matches!(store.load(), Ok(None)));

        let state = CartState::default();
        assert!(store.save(&state).is_ok());
        assert_eq!(store.snapshot(), Some(state));
        assert_eq!(store.save_count(), 1);

        assert!(store.clear().is_ok());
        assert!(matches!(store.load(), Ok(None)));
    }
}
