// apps/storefront/src/services/mod.rs

pub mod backend;
pub mod navigation;
pub mod sessions;

pub use backend::BackendClient;
pub use sessions::{Session, SessionRegistry};
