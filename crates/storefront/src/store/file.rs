//! JSON file cart store.
//!
//! The on-disk equivalent of the `cart` cookie: one JSON document holding the
//! whole snapshot. Writes go to a sibling temp file that is renamed over the
//! snapshot, so a crash never leaves half a cart behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use az_clothes_core::CartState;

use super::{CartStore, StoreError};

/// Persists the snapshot to a JSON file.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Result<Option<CartState>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, snapshot: &CartState) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use az_clothes_core::{CartAction, CartItem, Price, ShippingAddress, Slug, transition};

    use super::*;

    fn shirt() -> CartItem {
        CartItem {
            id: None,
            slug: Slug::parse("free-shirt").unwrap_or_else(|e| panic!("{e}")),
            name: "Free Shirt".to_owned(),
            image: "/images/shirt1.jpg".to_owned(),
            price: Price::from_dollars(70),
            quantity: 2,
            count_in_stock: 20,
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let store = FileCartStore::new(dir.path().join("cart.json"));

        assert!(matches!(store.load(), Ok(None)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let store = FileCartStore::new(dir.path().join("nested/dir/cart.json"));

        let state = transition(CartState::default(), CartAction::AddItem(shirt()));
        let state = transition(
            state,
            CartAction::SaveShippingAddress(ShippingAddress {
                address: "1 Main St".to_owned(),
                ..ShippingAddress::default()
            }),
        );
        assert!(store.save(&state).is_ok());

        let loaded = store.load().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(loaded, Some(state));
        assert!(!dir.path().join("nested/dir/cart.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = dir.path().join("cart.json");
        fs::write(&path, "{not json").unwrap_or_else(|e| panic!("{e}"));

        let store = FileCartStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let store = FileCartStore::new(dir.path().join("cart.json"));

        assert!(store.save(&CartState::default()).is_ok());
        assert!(store.clear().is_ok());
        assert!(store.clear().is_ok());
        assert!(matches!(store.load(), Ok(None)));
    }
}
