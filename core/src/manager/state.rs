// storefront_cart/src/manager/state.rs

use super::auth::AuthState;
use crate::model::Cart;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Everything the manager keeps in memory for one session.
#[derive(Debug, Default)]
pub struct CartState {
  pub cart: Cart,
  pub auth: AuthState,
  pub loading: bool,
  /// Bumped on every authentication transition; a server load only applies
  /// its result when the epoch it started under is still current.
  pub epoch: u64,
}

/// Shared, lockable handle to a [`CartState`].
///
/// Guards are blocking and MUST NOT be held across `.await` points.
#[derive(Debug, Default)]
pub struct SharedCart(Arc<RwLock<CartState>>);

impl SharedCart {
  pub fn new(state: CartState) -> Self {
    SharedCart(Arc::new(RwLock::new(state)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, CartState> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, CartState> {
    self.0.write()
  }

  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&CartState) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }
}

impl Clone for SharedCart {
  fn clone(&self) -> Self {
    SharedCart(Arc::clone(&self.0))
  }
}
