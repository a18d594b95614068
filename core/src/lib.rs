// src/lib.rs

//! storefront_cart: session cart state for an e-commerce storefront.
//!
//! One [`CartManager`] owns the cart of one client session:
//!  - Line items are identified by `(productId, size, color)`; adding the same
//!    triple again increments the quantity.
//!  - Guest sessions persist the whole cart to a local key/value slot after
//!    every change.
//!  - Authenticated sessions persist through the remote cart API.
//!  - On sign-in, a non-empty guest cart is merged into the server cart once,
//!    and the guest slot is deleted.
//!  - Observers are notified of every change through an explicit subscriber list.

pub mod error;
pub mod kv;
pub mod manager;
pub mod model;
pub mod observer;
pub mod settings;
pub mod storage;

// --- Re-exports for the Public API ---

pub use crate::error::{CartError, CartResult};
pub use crate::kv::{FileStore, KeyValueStore, MemoryStore};
pub use crate::manager::{AuthState, CartManager, CartSummary};
pub use crate::model::{Cart, CartLineItem, LineKey, ProductId};
pub use crate::observer::{CartEvent, CartObservers, SubscriptionId};
pub use crate::settings::CartSettings;
pub use crate::storage::{BackendKind, CartBackend, LocalCartStore, RemoteCart, RemoteCartGateway};

/*
    Typical wiring:
    1. Create one `KeyValueStore` per client (`MemoryStore` or `FileStore`).
    2. `CartManager::connect(settings, store)` builds the local slot and the HTTP gateway.
    3. Call `reload()` to load the guest cart.
    4. After the client signs in, write its bearer token under `settings.token_key`
       and call `set_auth_state(AuthState::authenticated(user_id))`.
*/
