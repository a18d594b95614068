// apps/storefront/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use super::session_handlers::SessionHandle;
use crate::errors::AppError;
use crate::services::navigation;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct NavQuery {
  #[serde(default)]
  pub path: Option<String>,
}

#[instrument(name = "handler::home", skip(app_state))]
pub async fn home_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let view = app_state.backend.home().await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.backend.products().await?;
  Ok(HttpResponse::Ok().json(products))
}

/// Navigation works without a session; the cart badge is then zero.
#[instrument(name = "handler::nav", skip(session))]
pub async fn nav_handler(
  session: Option<SessionHandle>,
  query: web::Query<NavQuery>,
) -> Result<HttpResponse, AppError> {
  let path = query.into_inner().path.unwrap_or_else(|| "/".to_string());
  let cart_count = session.map(|s| s.cart.items_count()).unwrap_or(0);
  Ok(HttpResponse::Ok().json(navigation::nav_view(&path, cart_count)))
}
