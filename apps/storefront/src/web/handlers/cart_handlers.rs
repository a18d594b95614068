// apps/storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_cart::{LineKey, ProductId};
use tracing::{debug, instrument};

use super::session_handlers::SessionHandle;
use crate::errors::AppError;
use crate::models::CartView;

fn default_quantity() -> u32 {
  1
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
  pub product: Value,
  #[serde(default = "default_quantity")]
  pub quantity: u32,
  pub size: Option<String>,
  pub color: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
  pub product_id: ProductId,
  pub quantity: i64,
  pub size: Option<String>,
  pub color: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemPayload {
  pub product_id: ProductId,
  pub size: Option<String>,
  pub color: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
  pub product_id: String,
  pub size: Option<String>,
  pub color: Option<String>,
}

impl LookupQuery {
  /// Query strings carry no type, so `12` is read as a numeric id and
  /// anything that is not valid JSON as a string id.
  fn key(self) -> LineKey {
    let product_id = serde_json::from_str::<ProductId>(&self.product_id).unwrap_or(ProductId::Text(self.product_id));
    LineKey::new(product_id, non_empty(self.size), non_empty(self.color))
  }
}

fn outcome(success: bool, session: &SessionHandle) -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "success": success,
      "cart": CartView::from(session.cart.summary()),
  }))
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(session), fields(session_id = %session.id))]
pub async fn get_cart_handler(session: SessionHandle) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(CartView::from(session.cart.summary())))
}

#[instrument(
    name = "handler::add_item",
    skip(session, req_payload),
    fields(session_id = %session.id, quantity = req_payload.quantity)
)]
pub async fn add_item_handler(
  session: SessionHandle,
  req_payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let success = session
    .cart
    .add_to_cart(&payload.product, payload.quantity, non_empty(payload.size), non_empty(payload.color))
    .await;
  Ok(outcome(success, &session))
}

#[instrument(
    name = "handler::update_item",
    skip(session, req_payload),
    fields(session_id = %session.id, quantity = req_payload.quantity)
)]
pub async fn update_item_handler(
  session: SessionHandle,
  req_payload: web::Json<UpdateItemPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let key = LineKey::new(payload.product_id, non_empty(payload.size), non_empty(payload.color));
  let success = session.cart.update_quantity(&key, payload.quantity).await;
  Ok(outcome(success, &session))
}

#[instrument(name = "handler::remove_item", skip(session, req_payload), fields(session_id = %session.id))]
pub async fn remove_item_handler(
  session: SessionHandle,
  req_payload: web::Json<RemoveItemPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let key = LineKey::new(payload.product_id, non_empty(payload.size), non_empty(payload.color));
  let success = session.cart.remove_from_cart(&key).await;
  Ok(outcome(success, &session))
}

#[instrument(name = "handler::lookup_item", skip(session, query), fields(session_id = %session.id))]
pub async fn lookup_item_handler(
  session: SessionHandle,
  query: web::Query<LookupQuery>,
) -> Result<HttpResponse, AppError> {
  let key = query.into_inner().key();
  let item = session.cart.cart_item(&key);
  debug!(line = %key, in_cart = item.is_some(), "Cart line looked up.");
  Ok(HttpResponse::Ok().json(json!({
      "inCart": item.is_some(),
      "item": item,
  })))
}

#[instrument(name = "handler::clear_cart", skip(session), fields(session_id = %session.id))]
pub async fn clear_cart_handler(session: SessionHandle) -> Result<HttpResponse, AppError> {
  let success = session.cart.clear_cart().await;
  Ok(outcome(success, &session))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query(product_id: &str, size: Option<&str>) -> LookupQuery {
    LookupQuery {
      product_id: product_id.to_string(),
      size: size.map(str::to_string),
      color: Some(String::new()),
    }
  }

  #[test]
  fn lookup_query_reads_numeric_and_text_ids() {
    assert_eq!(query("12", Some("M")).key(), LineKey::new(12i64, Some("M".into()), None));
    assert_eq!(query("sku-9", None).key(), LineKey::new("sku-9", None, None));
    assert_eq!(query("\"12\"", None).key(), LineKey::new("12", None, None));
  }
}
