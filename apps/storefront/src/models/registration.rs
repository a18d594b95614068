// apps/storefront/src/models/registration.rs

//! Registration form payload and its field rules.

use crate::errors::FieldErrors;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const GENDERS: [&str; 3] = ["male", "female", "other"];

/// The form exactly as the client posts it. Missing fields default to empty so
/// that every rule can report its own message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub password: String,
  pub confirm_password: String,
  pub phone: String,
  pub date_of_birth: String,
  pub gender: String,
  pub agree_to_terms: bool,
}

/// What is forwarded to the backend: the form without `confirmPassword`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub password: String,
  pub phone: String,
  pub date_of_birth: NaiveDate,
  pub gender: String,
  pub agree_to_terms: bool,
}

fn check_name(value: &str, label: &str) -> Option<String> {
  let len = value.trim().chars().count();
  if len == 0 {
    Some(format!("{} is required", label))
  } else if len < 2 {
    Some(format!("{} must be at least 2 characters", label))
  } else if len > 50 {
    Some(format!("{} must be less than 50 characters", label))
  } else {
    None
  }
}

fn is_email_shaped(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
    None => false,
  }
}

fn check_password(value: &str) -> Option<&'static str> {
  if value.is_empty() {
    Some("Password is required")
  } else if value.chars().count() < 8 {
    Some("Password must be at least 8 characters")
  } else if !value.chars().any(|c| c.is_ascii_lowercase()) {
    Some("Password must contain at least one lowercase letter")
  } else if !value.chars().any(|c| c.is_ascii_uppercase()) {
    Some("Password must contain at least one uppercase letter")
  } else if !value.chars().any(|c| c.is_ascii_digit()) {
    Some("Password must contain at least one number")
  } else if value.chars().all(|c| c.is_ascii_alphanumeric()) {
    Some("Password must contain at least one special character")
  } else {
    None
  }
}

fn check_phone(value: &str) -> Option<&'static str> {
  let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')') || c.is_whitespace();
  if value.is_empty() {
    Some("Phone number is required")
  } else if !value.chars().all(allowed) {
    Some("Invalid phone number")
  } else if value.chars().count() < 10 {
    Some("Phone number must be at least 10 digits")
  } else {
    None
  }
}

impl RegistrationForm {
  /// Applies every field rule against `today`. All failing fields are
  /// reported, each with the message of its first failing rule.
  pub fn validate(&self, today: NaiveDate) -> Result<RegistrationSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut fail = |field: &str, message: String| {
      errors.insert(field.to_string(), message);
    };

    if let Some(message) = check_name(&self.first_name, "First name") {
      fail("firstName", message);
    }
    if let Some(message) = check_name(&self.last_name, "Last name") {
      fail("lastName", message);
    }

    let email = self.email.trim();
    if email.is_empty() {
      fail("email", "Email is required".into());
    } else if !is_email_shaped(email) {
      fail("email", "Invalid email address".into());
    }

    if let Some(message) = check_password(&self.password) {
      fail("password", message.into());
    }
    if self.confirm_password.is_empty() {
      fail("confirmPassword", "Confirm password is required".into());
    } else if self.confirm_password != self.password {
      fail("confirmPassword", "Passwords must match".into());
    }

    if let Some(message) = check_phone(&self.phone) {
      fail("phone", message.into());
    }

    let date_of_birth = if self.date_of_birth.trim().is_empty() {
      fail("dateOfBirth", "Date of birth is required".into());
      None
    } else {
      match NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d") {
        Ok(date) if date > today => {
          fail("dateOfBirth", "Date of birth cannot be in the future".into());
          None
        }
        Ok(date) => Some(date),
        Err(_) => {
          fail("dateOfBirth", "Invalid date of birth".into());
          None
        }
      }
    };

    if self.gender.is_empty() {
      fail("gender", "Gender is required".into());
    } else if !GENDERS.contains(&self.gender.as_str()) {
      fail("gender", "Please select a gender".into());
    }

    if !self.agree_to_terms {
      fail("agreeToTerms", "You must agree to the terms and conditions".into());
    }

    match date_of_birth {
      Some(date_of_birth) if errors.is_empty() => Ok(RegistrationSubmission {
        first_name: self.first_name.trim().to_string(),
        last_name: self.last_name.trim().to_string(),
        email: email.to_string(),
        password: self.password.clone(),
        phone: self.phone.trim().to_string(),
        date_of_birth,
        gender: self.gender.clone(),
        agree_to_terms: true,
      }),
      _ => Err(errors),
    }
  }
}
