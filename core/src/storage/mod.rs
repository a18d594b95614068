// storefront_cart/src/storage/mod.rs

//! The single storage interface the cart manager persists through, and its two
//! implementations: the local guest slot and the remote cart API.

pub mod local;
pub mod remote;

use crate::error::CartResult;
use crate::model::CartLineItem;
use async_trait::async_trait;

pub use local::LocalCartStore;
pub use remote::RemoteCartGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
  Local,
  Remote,
}

impl BackendKind {
  pub const fn as_str(self) -> &'static str {
    match self {
      BackendKind::Local => "local",
      BackendKind::Remote => "remote",
    }
  }
}

/// Where a session's cart is read from and written to.
#[async_trait]
pub trait CartBackend: Send + Sync {
  fn kind(&self) -> BackendKind;

  /// Returns `None` when the backend holds no cart at all.
  async fn load(&self) -> CartResult<Option<Vec<CartLineItem>>>;

  /// Stores the full item list, replacing whatever was stored.
  async fn persist(&self, items: &[CartLineItem]) -> CartResult<()>;

  async fn clear(&self) -> CartResult<()>;
}

/// A backend that can also absorb a guest cart at sign-in.
#[async_trait]
pub trait RemoteCart: CartBackend {
  /// Pushes guest items to the server and returns the server's merged cart.
  async fn merge(&self, items: Vec<CartLineItem>) -> CartResult<Vec<CartLineItem>>;
}
