// apps/storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub app_base_url: String,

  /// Base URL of the backend REST API the storefront consumes.
  pub backend_api_url: String,
  pub backend_timeout: Option<Duration>,

  /// When set, each session's local store is a JSON file in this directory.
  pub session_data_dir: Option<PathBuf>,
  /// Sessions unused this long are dropped from memory.
  pub session_idle_ttl: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let backend_api_url = get_env("BACKEND_API_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let backend_timeout = match get_env("BACKEND_TIMEOUT_SECS") {
      Ok(raw) => Some(Duration::from_secs(
        raw
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid BACKEND_TIMEOUT_SECS: {}", e)))?,
      )),
      Err(_) => None,
    };
    let session_data_dir = get_env("SESSION_DATA_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
    let session_idle_ttl = match get_env("SESSION_IDLE_SECS") {
      Ok(raw) => match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        Ok(_) => return Err(AppError::Config("SESSION_IDLE_SECS must be positive".to_string())),
        Err(e) => return Err(AppError::Config(format!("Invalid SESSION_IDLE_SECS: {}", e))),
      },
      Err(_) => Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      app_base_url,
      backend_api_url,
      backend_timeout,
      session_data_dir,
      session_idle_ttl,
    })
  }

  /// Settings for the per-session cart managers, derived from the backend config.
  pub fn cart_settings(&self) -> storefront_cart::CartSettings {
    let settings = storefront_cart::CartSettings::new(self.backend_api_url.clone());
    match self.backend_timeout {
      Some(timeout) => settings.with_request_timeout(timeout),
      None => settings,
    }
  }
}
