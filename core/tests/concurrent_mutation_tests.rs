// tests/concurrent_mutation_tests.rs
mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;
use storefront_cart::{AuthState, CartManager, LocalCartStore};

fn slow_manager(remote: FakeRemote) -> (Arc<SlowFirstWrite>, Arc<CartManager<FakeRemote>>) {
  let store = Arc::new(SlowFirstWrite::new(Duration::from_millis(300)));
  let local = LocalCartStore::new(store.clone(), "cart");
  (store, Arc::new(CartManager::new(local, remote)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_racing_guest_adds_leave_slot_equal_to_memory() {
  setup_tracing();
  let (store, manager) = slow_manager(FakeRemote::new(vec![]));

  let first = tokio::spawn({
    let manager = manager.clone();
    async move { manager.add_to_cart(&product(1, 2.0), 1, None, None).await }
  });
  tokio::time::sleep(Duration::from_millis(50)).await;
  let second = tokio::spawn({
    let manager = manager.clone();
    async move { manager.add_to_cart(&product(2, 3.0), 1, None, None).await }
  });

  assert!(first.await.unwrap());
  assert!(second.await.unwrap());
  assert_eq!(manager.items().len(), 2);
  assert_eq!(stored_guest_cart(&store.inner), Some(manager.items()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_guest_add_in_flight_during_sign_in_is_merged_not_resurrected() {
  setup_tracing();
  let remote = FakeRemote::new(vec![]);
  let (store, manager) = slow_manager(remote.clone());

  let add = tokio::spawn({
    let manager = manager.clone();
    async move { manager.add_to_cart(&product(5, 4.0), 2, None, None).await }
  });
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(manager.set_auth_state(AuthState::authenticated("u-1")).await);
  assert!(add.await.unwrap());

  assert_eq!(stored_guest_cart(&store.inner), None);
  let server = remote.state.lock();
  assert_eq!(server.merge_calls, 1);
  assert_eq!(server.merged_payloads[0].len(), 1);
  assert_eq!(server.merged_payloads[0][0].quantity, 2);
  drop(server);
  assert_eq!(manager.items_count(), 2);
}
