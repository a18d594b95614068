// apps/storefront/src/models/views.rs

//! JSON views returned by the gateway.

use serde::Serialize;
use serde_json::Value;
use storefront_cart::{CartLineItem, CartSummary};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
  pub featured_products: Vec<Value>,
  pub new_arrivals: Vec<Value>,
  pub categories: Vec<Value>,
  pub testimonials: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub items: Vec<CartLineItem>,
  pub count: u64,
  pub total: f64,
  pub is_loading: bool,
}

impl From<CartSummary> for CartView {
  fn from(summary: CartSummary) -> Self {
    Self {
      items: summary.items,
      count: summary.count,
      total: summary.total,
      is_loading: summary.loading,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
  pub href: &'static str,
  pub label: &'static str,
  pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavView {
  pub links: Vec<NavLink>,
  pub cart_count: u64,
}
