// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storefront_cart::{
  BackendKind, CartBackend, CartError, CartLineItem, CartManager, CartResult, KeyValueStore, LocalCartStore,
  MemoryStore, RemoteCart,
};
use tracing::Level;

// --- Fake remote cart API ---

/// How the fake server answers the merge call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeBehaviour {
  /// Appends guest items after the server's own items, duplicates included.
  Append,
  /// Answers 200 with a body lacking `items`.
  EmptyBody,
  /// Answers with a failure status.
  Fail,
}

#[derive(Debug, Default)]
pub struct FakeServerState {
  pub items: Vec<CartLineItem>,
  pub load_calls: usize,
  pub merge_calls: usize,
  pub sync_calls: usize,
  pub clear_calls: usize,
  pub merged_payloads: Vec<Vec<CartLineItem>>,
  pub fail_load: bool,
  pub fail_sync: bool,
  pub fail_clear: bool,
}

#[derive(Clone)]
pub struct FakeRemote {
  pub state: Arc<Mutex<FakeServerState>>,
  pub merge: MergeBehaviour,
}

impl FakeRemote {
  pub fn new(server_items: Vec<CartLineItem>) -> Self {
    Self {
      state: Arc::new(Mutex::new(FakeServerState {
        items: server_items,
        ..Default::default()
      })),
      merge: MergeBehaviour::Append,
    }
  }

  pub fn with_merge(mut self, merge: MergeBehaviour) -> Self {
    self.merge = merge;
    self
  }

  fn rejected(endpoint: &str) -> CartError {
    CartError::Status {
      endpoint: endpoint.to_string(),
      status: 500,
    }
  }
}

#[async_trait]
impl CartBackend for FakeRemote {
  fn kind(&self) -> BackendKind {
    BackendKind::Remote
  }

  async fn load(&self) -> CartResult<Option<Vec<CartLineItem>>> {
    let mut state = self.state.lock();
    state.load_calls += 1;
    if state.fail_load {
      return Err(Self::rejected("/api/cart"));
    }
    Ok(Some(state.items.clone()))
  }

  async fn persist(&self, items: &[CartLineItem]) -> CartResult<()> {
    let mut state = self.state.lock();
    state.sync_calls += 1;
    if state.fail_sync {
      return Err(Self::rejected("/api/cart/sync"));
    }
    state.items = items.to_vec();
    Ok(())
  }

  async fn clear(&self) -> CartResult<()> {
    let mut state = self.state.lock();
    state.clear_calls += 1;
    if state.fail_clear {
      return Err(Self::rejected("/api/cart/clear"));
    }
    state.items.clear();
    Ok(())
  }
}

#[async_trait]
impl RemoteCart for FakeRemote {
  async fn merge(&self, items: Vec<CartLineItem>) -> CartResult<Vec<CartLineItem>> {
    let mut state = self.state.lock();
    state.merge_calls += 1;
    state.merged_payloads.push(items.clone());
    match self.merge {
      MergeBehaviour::Append => {
        state.items.extend(items);
        Ok(state.items.clone())
      }
      MergeBehaviour::EmptyBody => Ok(Vec::new()),
      MergeBehaviour::Fail => Err(Self::rejected("/api/cart/merge")),
    }
  }
}

// --- Slow local store ---

/// Key/value store whose first write stalls, so a concurrent mutation can
/// overtake it if slot writes are not ordered.
pub struct SlowFirstWrite {
  pub inner: MemoryStore,
  stalled: AtomicBool,
  delay: Duration,
}

impl SlowFirstWrite {
  pub fn new(delay: Duration) -> Self {
    Self {
      inner: MemoryStore::new(),
      stalled: AtomicBool::new(false),
      delay,
    }
  }
}

impl KeyValueStore for SlowFirstWrite {
  fn get(&self, key: &str) -> CartResult<Option<String>> {
    self.inner.get(key)
  }

  fn set(&self, key: &str, value: &str) -> CartResult<()> {
    if !self.stalled.swap(true, Ordering::SeqCst) {
      std::thread::sleep(self.delay);
    }
    self.inner.set(key, value)
  }

  fn remove(&self, key: &str) -> CartResult<()> {
    self.inner.remove(key)
  }
}

// --- Fixtures ---

pub struct Harness {
  pub kv: Arc<MemoryStore>,
  pub remote: FakeRemote,
  pub manager: CartManager<FakeRemote>,
}

pub fn harness(server_items: Vec<CartLineItem>) -> Harness {
  harness_with(FakeRemote::new(server_items))
}

pub fn harness_with(remote: FakeRemote) -> Harness {
  let kv = Arc::new(MemoryStore::new());
  let local = LocalCartStore::new(kv.clone(), "cart");
  let manager = CartManager::new(local, remote.clone());
  Harness { kv, remote, manager }
}

pub fn product(id: i64, price: f64) -> Value {
  json!({ "id": id, "name": format!("Product {}", id), "price": price })
}

pub fn line(id: i64, price: f64, quantity: u32, size: Option<&str>) -> CartLineItem {
  CartLineItem::from_product(&product(id, price), quantity, size.map(str::to_string), None).unwrap()
}

pub fn stored_guest_cart(kv: &MemoryStore) -> Option<Vec<CartLineItem>> {
  kv.get("cart")
    .unwrap()
    .map(|raw| serde_json::from_str(&raw).unwrap())
}

pub fn some(s: &str) -> Option<String> {
  Some(s.to_string())
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
