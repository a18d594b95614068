// apps/storefront/src/services/backend.rs

//! Client for the backend endpoints the storefront pages consume directly:
//! home-page sections, the product listing and registration. Product and
//! content payloads are opaque JSON and are passed through untouched.

use crate::errors::{AppError, FieldErrors, Result};
use crate::models::registration::RegistrationSubmission;
use crate::models::views::HomeView;
use futures_util::future;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

pub const FEATURED_PRODUCTS_PATH: &str = "/api/featured-products.php";
pub const NEW_ARRIVALS_PATH: &str = "/api/new-arrivals.php";
pub const CATEGORIES_PATH: &str = "/api/categories.php";
pub const TESTIMONIALS_PATH: &str = "/api/testimonials.php";
pub const PRODUCTS_PATH: &str = "/api/products";
pub const REGISTER_PATH: &str = "/api/register.php";

pub const HOME_LOAD_FAILED: &str = "Failed to load data. Please try again later.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const REGISTRATION_NETWORK_ERROR: &str = "Network error. Please try again.";

#[derive(Debug, Default, Deserialize)]
struct RegistrationRejection {
  #[serde(default)]
  errors: Option<FieldErrors>,
  #[serde(default)]
  message: Option<String>,
}

#[derive(Clone)]
pub struct BackendClient {
  client: Client,
  base_url: Arc<str>,
}

impl BackendClient {
  pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self {
      client: builder.build()?,
      base_url: Arc::from(base_url.trim_end_matches('/')),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Fetches one home-page section. A non-2xx answer leaves the section empty;
  /// transport and decode failures are errors.
  async fn section(&self, path: &'static str) -> std::result::Result<Vec<Value>, reqwest::Error> {
    let response = self.client.get(self.url(path)).send().await?;
    if !response.status().is_success() {
      warn!(endpoint = path, status = response.status().as_u16(), "Home section unavailable; leaving it empty.");
      return Ok(Vec::new());
    }
    response.json::<Vec<Value>>().await
  }

  /// Loads the four home-page sections concurrently.
  #[instrument(name = "BackendClient::home", skip(self))]
  pub async fn home(&self) -> Result<HomeView> {
    let (featured, arrivals, categories, testimonials) = future::join4(
      self.section(FEATURED_PRODUCTS_PATH),
      self.section(NEW_ARRIVALS_PATH),
      self.section(CATEGORIES_PATH),
      self.section(TESTIMONIALS_PATH),
    )
    .await;

    let view = match (featured, arrivals, categories, testimonials) {
      (Ok(featured_products), Ok(new_arrivals), Ok(categories), Ok(testimonials)) => HomeView {
        featured_products,
        new_arrivals,
        categories,
        testimonials,
      },
      (featured, arrivals, categories, testimonials) => {
        let first_error = [featured.err(), arrivals.err(), categories.err(), testimonials.err()]
          .into_iter()
          .flatten()
          .next();
        error!(error = ?first_error, "Failed to load home page data.");
        return Err(AppError::Upstream(HOME_LOAD_FAILED.to_string()));
      }
    };

    info!(
      featured = view.featured_products.len(),
      arrivals = view.new_arrivals.len(),
      categories = view.categories.len(),
      testimonials = view.testimonials.len(),
      "Home page data loaded."
    );
    Ok(view)
  }

  #[instrument(name = "BackendClient::products", skip(self))]
  pub async fn products(&self) -> Result<Vec<Value>> {
    let response = self.client.get(self.url(PRODUCTS_PATH)).send().await?;
    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "Product listing rejected.");
      return Err(AppError::Upstream(format!("Product listing answered with status {}", status.as_u16())));
    }
    let products = response.json::<Vec<Value>>().await?;
    info!(count = products.len(), "Products fetched.");
    Ok(products)
  }

  /// Submits a validated registration. Backend field errors come back as a
  /// validation error; any other rejection carries the backend's message.
  #[instrument(name = "BackendClient::register", skip(self, submission), fields(email = %submission.email))]
  pub async fn register(&self, submission: &RegistrationSubmission) -> Result<()> {
    let response = self
      .client
      .post(self.url(REGISTER_PATH))
      .json(submission)
      .send()
      .await
      .map_err(|e| {
        error!(error = %e, "Registration request failed.");
        AppError::Upstream(REGISTRATION_NETWORK_ERROR.to_string())
      })?;

    let status = response.status();
    if status.is_success() {
      info!("Registration accepted by backend.");
      return Ok(());
    }

    let rejection = response.json::<RegistrationRejection>().await.unwrap_or_default();
    warn!(status = status.as_u16(), "Registration rejected by backend.");
    match rejection.errors {
      Some(fields) if !fields.is_empty() => Err(AppError::validation(REGISTRATION_FAILED, fields)),
      _ => {
        let message = rejection.message.unwrap_or_else(|| REGISTRATION_FAILED.to_string());
        if status.is_client_error() {
          Err(AppError::validation(message, FieldErrors::new()))
        } else {
          Err(AppError::Upstream(message))
        }
      }
    }
  }
}
