// tests/remote_gateway_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use storefront_cart::{AuthState, CartManager, CartSettings, KeyValueStore, MemoryStore};

// Nothing listens on port 1; every request fails at connect time.
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn connected(token: Option<&str>) -> (Arc<MemoryStore>, CartManager) {
  let kv = Arc::new(MemoryStore::new());
  if let Some(token) = token {
    kv.set("token", token).unwrap();
  }
  let settings = Arc::new(CartSettings::new(UNREACHABLE).with_request_timeout(Duration::from_secs(5)));
  let manager = CartManager::connect(settings, kv.clone()).unwrap();
  (kv, manager)
}

#[tokio::test]
#[serial]
async fn test_unreachable_backend_fails_sign_in_but_keeps_guest_slot() {
  setup_tracing();
  let (kv, manager) = connected(Some("t0k3n"));
  manager.add_to_cart(&product(1, 3.0), 1, None, None).await;

  assert!(!manager.set_auth_state(AuthState::authenticated("u-1")).await);
  assert!(stored_guest_cart(&kv).is_some());
  assert!(!manager.is_loading());
}

#[tokio::test]
#[serial]
async fn test_transport_failure_on_sync_keeps_optimistic_add() {
  setup_tracing();
  let (_kv, manager) = connected(Some("t0k3n"));
  manager.set_auth_state(AuthState::authenticated("u-1")).await;

  assert!(!manager.add_to_cart(&product(1, 3.0), 2, None, None).await);
  assert_eq!(manager.items_count(), 2);
  assert!(!manager.clear_cart().await);
  assert_eq!(manager.items_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_missing_token_fails_authenticated_operations() {
  setup_tracing();
  let (_kv, manager) = connected(None);
  assert!(!manager.set_auth_state(AuthState::authenticated("u-1")).await);
  assert!(!manager.add_to_cart(&product(1, 3.0), 1, None, None).await);
  assert_eq!(manager.items().len(), 1);
}
