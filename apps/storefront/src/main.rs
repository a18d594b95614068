// apps/storefront/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use std::io;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> io::Result<()> {
  // RUST_LOG overrides the default level.
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront gateway...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
  })?;

  if let Some(dir) = &app_config.session_data_dir {
    std::fs::create_dir_all(dir)?;
    tracing::info!(dir = %dir.display(), "Session stores are file backed.");
  }

  let app_state = AppState::build(app_config).map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise application state.");
    io::Error::new(io::ErrorKind::Other, e.to_string())
  })?;

  let sweeper_state = app_state.clone();
  let idle_ttl = sweeper_state.config.session_idle_ttl;
  actix_web::rt::spawn(async move {
    let mut ticker = actix_web::rt::time::interval(idle_ttl.min(Duration::from_secs(60)));
    loop {
      ticker.tick().await;
      sweeper_state.sessions.evict_idle(idle_ttl);
    }
  });

  let server_address = format!("{}:{}", app_state.config.server_host, app_state.config.server_port);
  tracing::info!(
    backend = %app_state.config.backend_api_url,
    public_url = %app_state.config.app_base_url,
    "Attempting to bind server to {}...",
    server_address
  );

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
