// storefront_cart/src/manager/mod.rs

//! The cart state manager: the in-memory source of truth for one session's cart.
//!
//! The manager picks its backend from the session's [`AuthState`]: guests
//! persist to the [`LocalCartStore`], authenticated users to a [`RemoteCart`].
//! Every mutating operation updates memory first, then persists the full item
//! list: guest slots are written under the state lock, remote syncs after it. Storage and network failures are logged and
//! reported as `false`; the in-memory change is never rolled back.

pub mod auth;
pub mod state;

pub use auth::AuthState;
pub use state::{CartState, SharedCart};

use crate::error::CartResult;
use crate::kv::KeyValueStore;
use crate::model::{Cart, CartLineItem, LineKey};
use crate::observer::{CartEvent, CartObservers};
use crate::settings::CartSettings;
use crate::storage::{CartBackend, LocalCartStore, RemoteCart, RemoteCartGateway};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Point-in-time view of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
  pub items: Vec<CartLineItem>,
  pub count: u64,
  pub total: f64,
  pub loading: bool,
}

pub struct CartManager<R = RemoteCartGateway> {
  state: SharedCart,
  local: LocalCartStore,
  remote: R,
  observers: CartObservers,
}

impl CartManager<RemoteCartGateway> {
  /// Wires the local slot and the HTTP gateway onto one client-local store.
  pub fn connect(settings: Arc<CartSettings>, store: Arc<dyn KeyValueStore>) -> CartResult<Self> {
    let client = RemoteCartGateway::build_client(&settings)?;
    let local = LocalCartStore::new(store.clone(), settings.cart_key.clone());
    let remote = RemoteCartGateway::new(client, settings, store);
    Ok(Self::new(local, remote))
  }
}

impl<R: RemoteCart> CartManager<R> {
  pub fn new(local: LocalCartStore, remote: R) -> Self {
    Self {
      state: SharedCart::default(),
      local,
      remote,
      observers: CartObservers::new(),
    }
  }

  pub fn observers(&self) -> &CartObservers {
    &self.observers
  }

  pub fn state(&self) -> SharedCart {
    self.state.clone()
  }

  pub fn auth_state(&self) -> AuthState {
    self.state.read().auth.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.read().loading
  }

  pub fn items(&self) -> Vec<CartLineItem> {
    self.state.map_read(|s| s.cart.items()).to_vec()
  }

  pub fn summary(&self) -> CartSummary {
    let state = self.state.read();
    CartSummary {
      items: state.cart.items().to_vec(),
      count: state.cart.items_count(),
      total: state.cart.total(),
      loading: state.loading,
    }
  }

  pub fn items_count(&self) -> u64 {
    self.state.read().cart.items_count()
  }

  pub fn total(&self) -> f64 {
    self.state.read().cart.total()
  }

  pub fn cart_item(&self, key: &LineKey) -> Option<CartLineItem> {
    self.state.read().cart.get(key).cloned()
  }

  pub fn is_in_cart(&self, key: &LineKey) -> bool {
    self.state.read().cart.contains(key)
  }

  fn write_guest_slot(&self, op: &'static str, items: &[CartLineItem]) -> bool {
    match self.local.write(items) {
      Ok(()) => {
        debug!(op, backend = "local", lines = items.len(), "Cart persisted.");
        true
      }
      Err(e) => {
        error!(op, backend = "local", error = %e, "Failed to persist cart; in-memory state kept.");
        false
      }
    }
  }

  /// Applies `f` to the cart under the write lock, then notifies observers.
  /// Guest carts are written to the local slot before the lock is released,
  /// so slot writes happen in the same order as the in-memory changes and
  /// never after a sign-in took over. The third value is that write's outcome,
  /// or `None` when the session is authenticated and still needs a remote sync.
  fn mutate<T>(&self, op: &'static str, f: impl FnOnce(&mut Cart) -> T) -> (T, Vec<CartLineItem>, Option<bool>) {
    let (out, items, stored) = {
      let mut state = self.state.write();
      let out = f(&mut state.cart);
      let items = state.cart.items().to_vec();
      let stored = (!state.auth.is_authenticated()).then(|| self.write_guest_slot(op, &items));
      (out, items, stored)
    };
    self.observers.notify(&CartEvent::Changed { items: items.clone() });
    (out, items, stored)
  }

  async fn persist(&self, op: &'static str, items: &[CartLineItem], stored: Option<bool>) -> bool {
    if let Some(stored) = stored {
      return stored;
    }
    match self.remote.persist(items).await {
      Ok(()) => {
        debug!(op, backend = "remote", lines = items.len(), "Cart persisted.");
        true
      }
      Err(e) => {
        error!(op, backend = "remote", error = %e, "Failed to persist cart; in-memory state kept.");
        false
      }
    }
  }

  #[instrument(name = "CartManager::add_to_cart", skip(self, product))]
  pub async fn add_to_cart(
    &self,
    product: &Value,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
  ) -> bool {
    if quantity == 0 {
      warn!("Refusing to add a line with quantity 0.");
      return false;
    }
    let item = match CartLineItem::from_product(product, quantity, size, color) {
      Ok(item) => item,
      Err(e) => {
        error!(error = %e, "Could not build a line item from the product snapshot.");
        return false;
      }
    };
    let key = item.key();
    let (line_quantity, items, stored) = self.mutate("add_to_cart", |cart| cart.add(item));
    info!(line = %key, line_quantity, "Added to cart.");
    self.persist("add_to_cart", &items, stored).await
  }

  #[instrument(name = "CartManager::remove_from_cart", skip(self, key), fields(line = %key))]
  pub async fn remove_from_cart(&self, key: &LineKey) -> bool {
    let (removed, items, stored) = self.mutate("remove_from_cart", |cart| cart.remove(key));
    debug!(removed, "Removed matching lines.");
    self.persist("remove_from_cart", &items, stored).await
  }

  /// Sets the quantity of a line; a quantity of zero or less removes it.
  #[instrument(name = "CartManager::update_quantity", skip(self, key), fields(line = %key))]
  pub async fn update_quantity(&self, key: &LineKey, quantity: i64) -> bool {
    if quantity <= 0 {
      return self.remove_from_cart(key).await;
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    let (found, items, stored) = self.mutate("update_quantity", |cart| cart.set_quantity(key, quantity));
    if !found {
      debug!("No line matched; cart unchanged.");
    }
    self.persist("update_quantity", &items, stored).await
  }

  #[instrument(name = "CartManager::clear_cart", skip(self))]
  pub async fn clear_cart(&self) -> bool {
    let guest_clear = {
      let mut state = self.state.write();
      state.cart.clear();
      (!state.auth.is_authenticated()).then(|| self.local.delete())
    };
    self.observers.notify(&CartEvent::Changed { items: Vec::new() });
    let (backend, outcome) = match guest_clear {
      Some(outcome) => (self.local.kind(), outcome),
      None => (self.remote.kind(), self.remote.clear().await),
    };
    match outcome {
      Ok(()) => {
        info!(backend = backend.as_str(), "Cart cleared.");
        true
      }
      Err(e) => {
        error!(backend = backend.as_str(), error = %e, "Failed to clear stored cart.");
        false
      }
    }
  }

  /// Replaces the in-memory cart if no auth transition happened since `epoch`.
  fn replace_if_current(&self, epoch: u64, cart: Cart) -> bool {
    let items = {
      let mut state = self.state.write();
      if state.epoch != epoch {
        return false;
      }
      state.cart = cart;
      state.cart.items().to_vec()
    };
    self.observers.notify(&CartEvent::Changed { items });
    true
  }

  fn set_loading(&self, loading: bool) {
    self.state.write().loading = loading;
    self.observers.notify(&CartEvent::Loading(loading));
  }

  /// Reloads the cart from the guest slot. A missing slot means an empty cart.
  #[instrument(name = "CartManager::load_cart_from_local", skip(self))]
  pub async fn load_cart_from_local(&self) -> bool {
    let epoch = self.state.read().epoch;
    match self.local.load().await {
      Ok(items) => {
        let cart = Cart::from_items(items.unwrap_or_default());
        debug!(lines = cart.len(), "Loaded guest cart.");
        self.replace_if_current(epoch, cart);
        true
      }
      Err(e) => {
        error!(error = %e, "Failed to read guest cart; starting empty.");
        self.replace_if_current(epoch, Cart::new());
        false
      }
    }
  }

  /// Fetches the server cart, then folds a non-empty guest cart into it
  /// through the merge endpoint. The guest slot is deleted once the merge
  /// was attempted, whatever its outcome.
  #[instrument(name = "CartManager::load_cart_from_server", skip(self))]
  pub async fn load_cart_from_server(&self) -> bool {
    let epoch = self.state.read().epoch;
    self.set_loading(true);
    let outcome = self.sync_from_server(epoch).await;
    self.set_loading(false);
    match outcome {
      Ok(()) => true,
      Err(e) => {
        error!(error = %e, "Failed to load cart from server.");
        false
      }
    }
  }

  async fn sync_from_server(&self, epoch: u64) -> CartResult<()> {
    let server_items = self.remote.load().await?.unwrap_or_default();
    if !self.replace_if_current(epoch, Cart::from_items(server_items)) {
      debug!("Authentication changed during load; discarding server cart.");
      return Ok(());
    }

    match self.local.has_guest_items() {
      Ok(true) => {}
      Ok(false) => return Ok(()),
      Err(e) => {
        warn!(error = %e, "Guest cart slot unreadable; skipping merge.");
        return Ok(());
      }
    }

    let guest = Cart::from_items(self.local.read()?.unwrap_or_default()).into_items();
    info!(guest_lines = guest.len(), "Merging guest cart into server cart.");
    let merged = self.remote.merge(guest).await;
    if let Err(e) = self.local.delete() {
      error!(error = %e, "Failed to delete guest cart after merge.");
    }
    let merged = merged?;
    self.replace_if_current(epoch, Cart::from_items(merged));
    Ok(())
  }

  /// Re-derives the cart after the session's identity changed: a full reload
  /// from the server when authenticated, from the guest slot otherwise.
  /// Setting the current state again does nothing.
  #[instrument(name = "CartManager::set_auth_state", skip(self, auth), fields(auth = %auth))]
  pub async fn set_auth_state(&self, auth: AuthState) -> bool {
    {
      let mut state = self.state.write();
      if state.auth == auth {
        return true;
      }
      state.auth = auth.clone();
      state.epoch += 1;
    }
    info!("Authentication changed; reloading cart.");
    self.reload().await
  }

  /// Loads the cart from the backend matching the current authentication state.
  pub async fn reload(&self) -> bool {
    if self.auth_state().is_authenticated() {
      self.load_cart_from_server().await
    } else {
      self.load_cart_from_local().await
    }
  }
}

impl<R> std::fmt::Debug for CartManager<R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.read();
    f.debug_struct("CartManager")
      .field("auth", &state.auth)
      .field("lines", &state.cart.len())
      .field("loading", &state.loading)
      .field("observers", &self.observers.len())
      .finish()
  }
}
