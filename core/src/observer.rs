// storefront_cart/src/observer.rs

//! Explicit subscriber list for cart change notifications.

use crate::model::CartLineItem;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
  /// The in-memory cart changed (mutation or reload). Carries the new items.
  Changed { items: Vec<CartLineItem> },
  /// A server load started (`true`) or finished (`false`).
  Loading(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer = Arc<dyn Fn(&CartEvent) + Send + Sync>;

#[derive(Default)]
pub struct CartObservers {
  next_id: AtomicU64,
  observers: RwLock<Vec<(SubscriptionId, Observer)>>,
}

impl CartObservers {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
  where
    F: Fn(&CartEvent) + Send + Sync + 'static,
  {
    let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self.observers.write().push((id, Arc::new(callback)));
    id
  }

  /// Returns false when `id` was not subscribed.
  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    let mut observers = self.observers.write();
    let before = observers.len();
    observers.retain(|(existing, _)| *existing != id);
    observers.len() != before
  }

  pub fn len(&self) -> usize {
    self.observers.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Calls every observer in subscription order. The list lock is released
  /// before any callback runs, so callbacks may subscribe or unsubscribe.
  pub fn notify(&self, event: &CartEvent) {
    let snapshot: Vec<Observer> = self.observers.read().iter().map(|(_, cb)| cb.clone()).collect();
    for callback in snapshot {
      callback(event);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::AtomicUsize;

  #[test]
  fn notifies_until_unsubscribed() {
    let observers = CartObservers::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_cb = hits.clone();
    let id = observers.subscribe(move |_| {
      hits_in_cb.fetch_add(1, Ordering::SeqCst);
    });

    observers.notify(&CartEvent::Loading(true));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(observers.unsubscribe(id));
    assert!(!observers.unsubscribe(id));
    observers.notify(&CartEvent::Loading(false));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(observers.is_empty());
  }

  #[test]
  fn callback_may_unsubscribe_itself() {
    let observers = Arc::new(CartObservers::new());
    let slot: Arc<parking_lot::Mutex<Option<SubscriptionId>>> = Arc::default();
    let (obs, slot_in_cb) = (observers.clone(), slot.clone());
    let id = observers.subscribe(move |_| {
      if let Some(id) = *slot_in_cb.lock() {
        obs.unsubscribe(id);
      }
    });
    *slot.lock() = Some(id);
    observers.notify(&CartEvent::Loading(true));
    assert!(observers.is_empty());
  }
}
