// storefront_cart/src/storage/remote.rs

//! HTTP gateway to the backend cart API.
//!
//! | operation | request                  | response            |
//! |-----------|--------------------------|---------------------|
//! | load      | `GET /api/cart`          | `{ items: [...] }`  |
//! | merge     | `POST /api/cart/merge`   | `{ items: [...] }`  |
//! | persist   | `POST /api/cart/sync`    | status only         |
//! | clear     | `DELETE /api/cart/clear` | status only         |
//!
//! Every request carries `Authorization: Bearer <token>`, with the token read
//! from the client's local store at call time.

use super::{BackendKind, CartBackend, RemoteCart};
use crate::error::{CartError, CartResult};
use crate::kv::KeyValueStore;
use crate::model::CartLineItem;
use crate::settings::CartSettings;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const CART_PATH: &str = "/api/cart";
pub const MERGE_PATH: &str = "/api/cart/merge";
pub const SYNC_PATH: &str = "/api/cart/sync";
pub const CLEAR_PATH: &str = "/api/cart/clear";

#[derive(Debug, Serialize)]
struct ItemsRequest<'a> {
  items: &'a [CartLineItem],
}

#[derive(Debug, Default, Deserialize)]
struct ItemsResponse {
  #[serde(default)]
  items: Option<Vec<CartLineItem>>,
}

#[derive(Clone)]
pub struct RemoteCartGateway {
  client: Client,
  settings: Arc<CartSettings>,
  store: Arc<dyn KeyValueStore>,
}

impl RemoteCartGateway {
  pub fn new(client: Client, settings: Arc<CartSettings>, store: Arc<dyn KeyValueStore>) -> Self {
    Self { client, settings, store }
  }

  /// Builds a client honouring the configured request timeout.
  pub fn build_client(settings: &CartSettings) -> CartResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = settings.request_timeout {
      builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
  }

  fn bearer_token(&self) -> CartResult<String> {
    self
      .store
      .get(&self.settings.token_key)?
      .filter(|token| !token.is_empty())
      .ok_or_else(|| CartError::MissingToken {
        key: self.settings.token_key.clone(),
      })
  }

  fn request(&self, method: Method, path: &str) -> CartResult<RequestBuilder> {
    let token = self.bearer_token()?;
    Ok(self.client.request(method, self.settings.endpoint(path)).bearer_auth(token))
  }

  async fn send(&self, builder: RequestBuilder, path: &str) -> CartResult<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
      warn!(endpoint = path, status = status.as_u16(), "Cart endpoint rejected the request.");
      return Err(CartError::Status {
        endpoint: path.to_string(),
        status: status.as_u16(),
      });
    }
    Ok(response)
  }

  async fn read_items(response: Response) -> CartResult<Vec<CartLineItem>> {
    let body = response.bytes().await?;
    let parsed: ItemsResponse = serde_json::from_slice(&body)?;
    Ok(parsed.items.unwrap_or_default())
  }
}

#[async_trait]
impl CartBackend for RemoteCartGateway {
  fn kind(&self) -> BackendKind {
    BackendKind::Remote
  }

  #[instrument(name = "RemoteCartGateway::load", skip(self), err(Display))]
  async fn load(&self) -> CartResult<Option<Vec<CartLineItem>>> {
    let builder = self.request(Method::GET, CART_PATH)?;
    let response = self.send(builder, CART_PATH).await?;
    let items = Self::read_items(response).await?;
    debug!(lines = items.len(), "Fetched server cart.");
    Ok(Some(items))
  }

  #[instrument(name = "RemoteCartGateway::persist", skip(self, items), fields(lines = items.len()), err(Display))]
  async fn persist(&self, items: &[CartLineItem]) -> CartResult<()> {
    let builder = self.request(Method::POST, SYNC_PATH)?.json(&ItemsRequest { items });
    self.send(builder, SYNC_PATH).await?;
    Ok(())
  }

  #[instrument(name = "RemoteCartGateway::clear", skip(self), err(Display))]
  async fn clear(&self) -> CartResult<()> {
    let builder = self.request(Method::DELETE, CLEAR_PATH)?;
    self.send(builder, CLEAR_PATH).await?;
    Ok(())
  }
}

#[async_trait]
impl RemoteCart for RemoteCartGateway {
  #[instrument(name = "RemoteCartGateway::merge", skip(self, items), fields(guest_lines = items.len()), err(Display))]
  async fn merge(&self, items: Vec<CartLineItem>) -> CartResult<Vec<CartLineItem>> {
    let builder = self.request(Method::POST, MERGE_PATH)?.json(&ItemsRequest { items: &items });
    let response = self.send(builder, MERGE_PATH).await?;
    let merged = Self::read_items(response).await?;
    debug!(lines = merged.len(), "Server merged guest cart.");
    Ok(merged)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kv::MemoryStore;

  fn gateway(token: Option<&str>) -> RemoteCartGateway {
    let kv = Arc::new(MemoryStore::new());
    if let Some(token) = token {
      kv.set("token", token).unwrap();
    }
    let settings = Arc::new(CartSettings::new("http://127.0.0.1:9"));
    RemoteCartGateway::new(Client::new(), settings, kv)
  }

  #[tokio::test]
  async fn missing_token_fails_before_any_request() {
    let err = gateway(None).load().await.unwrap_err();
    assert!(matches!(err, CartError::MissingToken { ref key } if key == "token"));
  }

  #[tokio::test]
  async fn empty_token_counts_as_missing() {
    let err = gateway(Some("")).clear().await.unwrap_err();
    assert!(matches!(err, CartError::MissingToken { .. }));
  }

  #[test]
  fn request_carries_bearer_header_and_full_url() {
    let request = gateway(Some("s3cret"))
      .request(Method::GET, CART_PATH)
      .unwrap()
      .build()
      .unwrap();
    assert_eq!(request.url().as_str(), "http://127.0.0.1:9/api/cart");
    assert_eq!(
      request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
      "Bearer s3cret"
    );
  }

  #[test]
  fn items_response_tolerates_missing_items() {
    let parsed: ItemsResponse = serde_json::from_str("{}").unwrap();
    assert!(parsed.items.is_none());
    let parsed: ItemsResponse = serde_json::from_str(r#"{"items":null}"#).unwrap();
    assert!(parsed.items.is_none());
  }
}
