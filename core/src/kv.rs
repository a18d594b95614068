// storefront_cart/src/kv.rs

//! Synchronous string key/value slots, the client-local storage the cart and
//! the bearer token live in.
//!
//! Access always completes within the call. Two implementations ship here:
//! [`MemoryStore`] for short-lived sessions and tests, and [`FileStore`],
//! which keeps every slot of one client in a single JSON object on disk.

use crate::error::{CartError, CartResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> CartResult<Option<String>>;
  fn set(&self, key: &str, value: &str) -> CartResult<()>;
  fn remove(&self, key: &str) -> CartResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> CartResult<Option<String>> {
    Ok(self.slots.lock().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> CartResult<()> {
    self.slots.lock().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> CartResult<()> {
    self.slots.lock().remove(key);
    Ok(())
  }
}

/// File-backed store. The whole map is rewritten on every `set`/`remove`.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  slots: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
  /// Opens the store at `path`, starting empty when the file does not exist yet.
  #[instrument(name = "FileStore::open", skip(path), fields(path = %path.as_ref().display()), err(Display))]
  pub fn open(path: impl AsRef<Path>) -> CartResult<Self> {
    let path = path.as_ref().to_path_buf();
    let slots = match fs::read_to_string(&path) {
      Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
      Ok(raw) => serde_json::from_str(&raw)?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => {
        return Err(CartError::Storage {
          key: path.display().to_string(),
          message: e.to_string(),
        })
      }
    };
    debug!(slot_count = slots.len(), "Opened file-backed key/value store.");
    Ok(Self {
      path,
      slots: Mutex::new(slots),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn flush(&self, key: &str, slots: &BTreeMap<String, String>) -> CartResult<()> {
    let storage_err = |message: String| CartError::Storage {
      key: key.to_string(),
      message,
    };
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(|e| storage_err(e.to_string()))?;
      }
    }
    let raw = serde_json::to_string_pretty(slots)?;
    fs::write(&self.path, raw).map_err(|e| storage_err(e.to_string()))
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> CartResult<Option<String>> {
    Ok(self.slots.lock().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> CartResult<()> {
    let mut slots = self.slots.lock();
    slots.insert(key.to_string(), value.to_string());
    self.flush(key, &slots)
  }

  fn remove(&self, key: &str) -> CartResult<()> {
    let mut slots = self.slots.lock();
    if slots.remove(key).is_some() {
      self.flush(key, &slots)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("cart").unwrap(), None);
    store.set("cart", "[]").unwrap();
    assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
    store.remove("cart").unwrap();
    assert_eq!(store.get("cart").unwrap(), None);
  }

  #[test]
  fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let store = FileStore::open(&path).unwrap();
    store.set("token", "abc").unwrap();
    store.set("cart", "[1]").unwrap();
    store.remove("cart").unwrap();
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
    assert_eq!(reopened.get("cart").unwrap(), None);
  }

  #[test]
  fn file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{not json").unwrap();
    assert!(matches!(FileStore::open(&path), Err(CartError::Decode(_))));
  }
}
