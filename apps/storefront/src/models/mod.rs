// apps/storefront/src/models/mod.rs

//! Request payloads and response views of the gateway.

pub mod registration;
pub mod views;

pub use registration::RegistrationForm;
pub use views::CartView;
