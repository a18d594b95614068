// storefront_cart/src/model/cart.rs

use super::line_item::{CartLineItem, LineKey};
use serde::{Deserialize, Serialize};

/// Ordered line items; order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
  items: Vec<CartLineItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a cart from an item list of unknown origin, coalescing entries that
  /// share a `(productId, size, color)` triple by summing their quantities
  /// into the first occurrence.
  pub fn from_items(items: Vec<CartLineItem>) -> Self {
    let mut cart = Cart::new();
    for item in items {
      cart.add(item);
    }
    cart
  }

  pub fn items(&self) -> &[CartLineItem] {
    &self.items
  }

  pub fn into_items(self) -> Vec<CartLineItem> {
    self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  /// Adds `item`, incrementing an existing line with the same key instead of
  /// appending a duplicate. Returns the quantity now held on that line.
  pub fn add(&mut self, item: CartLineItem) -> u32 {
    let key = item.key();
    match self.items.iter_mut().find(|existing| key.matches(existing)) {
      Some(existing) => {
        existing.quantity = existing.quantity.saturating_add(item.quantity);
        existing.quantity
      }
      None => {
        let quantity = item.quantity;
        self.items.push(item);
        quantity
      }
    }
  }

  /// Removes every line matching `key`. Returns how many were removed.
  pub fn remove(&mut self, key: &LineKey) -> usize {
    let before = self.items.len();
    self.items.retain(|item| !key.matches(item));
    before - self.items.len()
  }

  /// Overwrites the quantity of the line matching `key`. Returns false when no line matches.
  pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
    let mut found = false;
    for item in self.items.iter_mut().filter(|item| key.matches(item)) {
      item.quantity = quantity;
      found = true;
    }
    found
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
    self.items.iter().find(|item| key.matches(item))
  }

  pub fn contains(&self, key: &LineKey) -> bool {
    self.get(key).is_some()
  }

  pub fn items_count(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  pub fn total(&self) -> f64 {
    self.items.iter().fold(0.0, |total, item| total + item.line_total())
  }
}
