// storefront_cart/src/settings.rs

//! Connection and storage settings shared by the local store and the remote gateway.

use std::time::Duration;

/// Key of the local slot holding the guest cart.
pub const DEFAULT_CART_KEY: &str = "cart";
/// Key of the local slot holding the bearer token.
pub const DEFAULT_TOKEN_KEY: &str = "token";

#[derive(Debug, Clone)]
pub struct CartSettings {
  /// Base URL of the backend, without a trailing slash (e.g. `http://localhost:8000`).
  pub api_base_url: String,
  pub cart_key: String,
  pub token_key: String,
  /// `None` means requests may wait indefinitely.
  pub request_timeout: Option<Duration>,
}

impl CartSettings {
  pub fn new(api_base_url: impl Into<String>) -> Self {
    let mut api_base_url = api_base_url.into();
    while api_base_url.ends_with('/') {
      api_base_url.pop();
    }
    Self {
      api_base_url,
      cart_key: DEFAULT_CART_KEY.to_string(),
      token_key: DEFAULT_TOKEN_KEY.to_string(),
      request_timeout: None,
    }
  }

  pub fn with_cart_key(mut self, key: impl Into<String>) -> Self {
    self.cart_key = key.into();
    self
  }

  pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
    self.token_key = key.into();
    self
  }

  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = Some(timeout);
    self
  }

  /// Joins an absolute API path onto the base URL.
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.api_base_url, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trailing_slashes_are_dropped_from_base_url() {
    let settings = CartSettings::new("http://shop.test//");
    assert_eq!(settings.endpoint("/api/cart"), "http://shop.test/api/cart");
  }

  #[test]
  fn defaults_use_fixed_storage_keys() {
    let settings = CartSettings::new("http://shop.test");
    assert_eq!(settings.cart_key, "cart");
    assert_eq!(settings.token_key, "token");
    assert!(settings.request_timeout.is_none());
  }
}
