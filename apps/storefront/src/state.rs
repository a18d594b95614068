// apps/storefront/src/state.rs
use crate::config::AppConfig;
use crate::services::{BackendClient, SessionRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>, // Share loaded config
  pub sessions: Arc<SessionRegistry>,
  pub backend: BackendClient,
}

impl AppState {
  pub fn build(config: AppConfig) -> crate::errors::Result<Self> {
    let sessions = SessionRegistry::new(config.cart_settings(), config.session_data_dir.clone())?;
    let backend = BackendClient::new(&config.backend_api_url, config.backend_timeout)?;
    Ok(Self {
      config: Arc::new(config),
      sessions: Arc::new(sessions),
      backend,
    })
  }
}
