// storefront_cart/src/storage/local.rs

use super::{BackendKind, CartBackend};
use crate::error::CartResult;
use crate::kv::KeyValueStore;
use crate::model::CartLineItem;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Guest cart kept as one JSON array under a fixed key of the client's local store.
#[derive(Clone)]
pub struct LocalCartStore {
  store: Arc<dyn KeyValueStore>,
  key: String,
}

impl LocalCartStore {
  pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
    Self { store, key: key.into() }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn read(&self) -> CartResult<Option<Vec<CartLineItem>>> {
    match self.store.get(&self.key)? {
      Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
      None => Ok(None),
    }
  }

  pub fn write(&self, items: &[CartLineItem]) -> CartResult<()> {
    let raw = serde_json::to_string(items)?;
    self.store.set(&self.key, &raw)
  }

  pub fn delete(&self) -> CartResult<()> {
    self.store.remove(&self.key)
  }

  /// True when a guest cart with at least one line is stored.
  pub fn has_guest_items(&self) -> CartResult<bool> {
    Ok(self.read()?.is_some_and(|items| !items.is_empty()))
  }
}

#[async_trait]
impl CartBackend for LocalCartStore {
  fn kind(&self) -> BackendKind {
    BackendKind::Local
  }

  #[instrument(name = "LocalCartStore::load", skip(self), fields(key = %self.key), err(Display))]
  async fn load(&self) -> CartResult<Option<Vec<CartLineItem>>> {
    let items = self.read()?;
    debug!(found = items.is_some(), "Read guest cart slot.");
    Ok(items)
  }

  #[instrument(name = "LocalCartStore::persist", skip(self, items), fields(key = %self.key, lines = items.len()), err(Display))]
  async fn persist(&self, items: &[CartLineItem]) -> CartResult<()> {
    self.write(items)
  }

  #[instrument(name = "LocalCartStore::clear", skip(self), fields(key = %self.key), err(Display))]
  async fn clear(&self) -> CartResult<()> {
    self.delete()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::CartError;
  use crate::kv::MemoryStore;
  use serde_json::json;

  fn store() -> (Arc<MemoryStore>, LocalCartStore) {
    let kv = Arc::new(MemoryStore::new());
    let local = LocalCartStore::new(kv.clone(), "cart");
    (kv, local)
  }

  #[test]
  fn missing_slot_reads_as_none() {
    let (_, local) = store();
    assert!(local.read().unwrap().is_none());
    assert!(!local.has_guest_items().unwrap());
  }

  #[test]
  fn write_then_read_keeps_order() {
    let (kv, local) = store();
    let items = vec![
      CartLineItem::from_product(&json!({ "id": 2, "price": 1 }), 1, None, None).unwrap(),
      CartLineItem::from_product(&json!({ "id": 1, "price": 1 }), 1, None, None).unwrap(),
    ];
    local.write(&items).unwrap();
    assert_eq!(local.read().unwrap().unwrap(), items);
    assert!(kv.get("cart").unwrap().unwrap().starts_with('['));
  }

  #[test]
  fn empty_array_reads_as_empty_list() {
    let (kv, local) = store();
    kv.set("cart", "[]").unwrap();
    assert_eq!(local.read().unwrap(), Some(Vec::new()));
    assert!(!local.has_guest_items().unwrap());
  }

  #[test]
  fn malformed_slot_is_a_decode_error() {
    let (kv, local) = store();
    kv.set("cart", "{oops").unwrap();
    assert!(matches!(local.read(), Err(CartError::Decode(_))));
  }
}
