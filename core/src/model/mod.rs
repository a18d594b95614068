// storefront_cart/src/model/mod.rs

//! Cart data model: line items, their identity triple, and the ordered cart.

pub mod cart;
pub mod line_item;

pub use cart::Cart;
pub use line_item::{CartLineItem, LineKey, ProductId};
