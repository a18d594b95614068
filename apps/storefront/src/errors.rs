// apps/storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use storefront_cart::CartError;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {message}")]
  Validation { message: String, fields: FieldErrors },

  #[error("Session Error: {0}")]
  Session(String),

  #[error("Backend Error: {0}")]
  Upstream(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Cart Error: {source}")]
  Cart {
    #[from]
    source: CartError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(message: impl Into<String>, fields: FieldErrors) -> Self {
    AppError::Validation {
      message: message.into(),
      fields,
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(other) => match other.downcast::<CartError>() {
        Ok(cart_err) => AppError::Cart { source: cart_err },
        Err(other) => AppError::Internal(other.to_string()),
      },
    }
  }
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Upstream(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation { message, fields } => {
        HttpResponse::UnprocessableEntity().json(json!({"error": message, "errors": fields}))
      }
      AppError::Session(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Upstream(m) => HttpResponse::BadGateway().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Cart { source } => {
        HttpResponse::InternalServerError().json(json!({"error": "Cart storage error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
