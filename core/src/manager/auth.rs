// storefront_cart/src/manager/auth.rs

use std::fmt;

/// Who the session belongs to. Decides which backend the cart lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
  #[default]
  Guest,
  Authenticated { user_id: String },
}

impl AuthState {
  pub fn authenticated(user_id: impl Into<String>) -> Self {
    AuthState::Authenticated { user_id: user_id.into() }
  }

  pub fn is_authenticated(&self) -> bool {
    matches!(self, AuthState::Authenticated { .. })
  }

  pub fn user_id(&self) -> Option<&str> {
    match self {
      AuthState::Guest => None,
      AuthState::Authenticated { user_id } => Some(user_id),
    }
  }
}

impl fmt::Display for AuthState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AuthState::Guest => f.write_str("guest"),
      AuthState::Authenticated { user_id } => write!(f, "user:{}", user_id),
    }
  }
}
