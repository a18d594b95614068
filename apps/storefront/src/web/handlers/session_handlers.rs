// apps/storefront/src/web/handlers/session_handlers.rs

use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use serde_json::json;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CartView;
use crate::services::Session;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "X-Session-ID";

/// Resolves the caller's session from the `X-Session-ID` header.
#[derive(Clone)]
pub struct SessionHandle(pub Arc<Session>);

impl Deref for SessionHandle {
  type Target = Session;

  fn deref(&self) -> &Session {
    &self.0
  }
}

fn session_id(req: &HttpRequest) -> Result<Uuid, AppError> {
  req
    .headers()
    .get(SESSION_HEADER)
    .and_then(|value| value.to_str().ok())
    .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
    .ok_or_else(|| {
      warn!("SessionHandle extractor: missing or invalid {} header.", SESSION_HEADER);
      AppError::Session(format!("Missing or invalid {} header.", SESSION_HEADER))
    })
}

impl FromRequest for SessionHandle {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let id = session_id(req);
    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let session = state.sessions.get(id?).await?;
      Ok(SessionHandle(session))
    })
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
  pub token: String,
  pub user_id: String,
}

#[instrument(name = "handler::create_session", skip(app_state))]
pub async fn create_session_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.create().await?;
  info!(session_id = %session.id, active_sessions = app_state.sessions.len(), "Session opened.");
  Ok(HttpResponse::Created().json(json!({
      "sessionId": session.id,
      "cart": CartView::from(session.cart.summary()),
  })))
}

#[instrument(
    name = "handler::sign_in",
    skip(session, req_payload),
    fields(session_id = %session.id, user_id = %req_payload.user_id)
)]
pub async fn sign_in_handler(
  session: SessionHandle,
  req_payload: web::Json<SignInPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  if payload.token.trim().is_empty() || payload.user_id.trim().is_empty() {
    return Err(AppError::validation("Both token and userId are required.", Default::default()));
  }
  let success = session.sign_in(&payload.token, &payload.user_id).await?;
  if !success {
    warn!("Signed in, but the server cart could not be loaded.");
  }
  Ok(HttpResponse::Ok().json(json!({
      "success": success,
      "userId": payload.user_id,
      "cart": CartView::from(session.cart.summary()),
  })))
}

#[instrument(name = "handler::sign_out", skip(session), fields(session_id = %session.id))]
pub async fn sign_out_handler(session: SessionHandle) -> Result<HttpResponse, AppError> {
  let success = session.sign_out().await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": success,
      "cart": CartView::from(session.cart.summary()),
  })))
}

#[instrument(name = "handler::end_session", skip(app_state, session), fields(session_id = %session.id))]
pub async fn end_session_handler(
  app_state: web::Data<AppState>,
  session: SessionHandle,
) -> Result<HttpResponse, AppError> {
  let removed = app_state.sessions.remove(session.id)?;
  Ok(HttpResponse::Ok().json(json!({ "success": removed })))
}
