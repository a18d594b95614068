// apps/storefront/src/web/handlers/register_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::RegistrationForm;
use crate::state::AppState;

pub const REGISTRATION_ACCEPTED: &str = "Registration successful! Please check your email to verify your account.";
pub const FORM_INVALID: &str = "Please correct the highlighted fields.";

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegistrationForm>,
) -> Result<HttpResponse, AppError> {
  let submission = req_payload.validate(Utc::now().date_naive()).map_err(|fields| {
    warn!(invalid_fields = fields.len(), "Registration form rejected.");
    AppError::validation(FORM_INVALID, fields)
  })?;

  app_state.backend.register(&submission).await?;
  info!("Registration forwarded successfully.");
  Ok(HttpResponse::Created().json(json!({ "message": REGISTRATION_ACCEPTED })))
}
