// storefront_cart/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Local storage failure for key '{key}': {message}")]
  Storage { key: String, message: String },

  #[error("Cart payload could not be decoded: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Cart endpoint '{endpoint}' answered with status {status}")]
  Status { endpoint: String, status: u16 },

  #[error("No bearer token stored under key '{key}'")]
  MissingToken { key: String },

  #[error("Product snapshot is not usable as a line item: {0}")]
  InvalidProduct(String),

  #[error("Internal cart error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for CartError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a CartError that travelled through anyhow instead of nesting it.
    match err.downcast::<CartError>() {
      Ok(cart_err) => cart_err,
      Err(other) => CartError::Internal(other.to_string()),
    }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
