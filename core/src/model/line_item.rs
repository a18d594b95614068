// storefront_cart/src/model/line_item.rs

use crate::error::{CartError, CartResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// External product identifier as the catalog hands it out.
///
/// Numbers and strings are kept apart: `1` and `"1"` are different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
  Number(i64),
  Text(String),
}

impl ProductId {
  /// Reads `id`, falling back to `_id` when `id` is missing, null, `0`,
  /// `false` or empty. Non-integer numbers are not valid ids.
  pub fn from_snapshot(product: &Value) -> Option<Self> {
    let raw = ["id", "_id"]
      .into_iter()
      .filter_map(|field| product.get(field))
      .find(|v| is_set(v))?;
    match raw {
      Value::Number(n) => n.as_i64().map(ProductId::Number),
      Value::String(s) if !s.is_empty() => Some(ProductId::Text(s.clone())),
      _ => None,
    }
  }
}

fn is_set(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64() != Some(0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// A price given either as a JSON number or as a numeric string.
fn parse_price(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
    _ => None,
  }
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
  let raw = Value::deserialize(deserializer)?;
  parse_price(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid price {}", raw)))
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProductId::Number(n) => write!(f, "{}", n),
      ProductId::Text(s) => f.write_str(s),
    }
  }
}

impl From<i64> for ProductId {
  fn from(n: i64) -> Self {
    ProductId::Number(n)
  }
}

impl From<i32> for ProductId {
  fn from(n: i32) -> Self {
    ProductId::Number(i64::from(n))
  }
}

impl From<&str> for ProductId {
  fn from(s: &str) -> Self {
    ProductId::Text(s.to_string())
  }
}

impl From<String> for ProductId {
  fn from(s: String) -> Self {
    ProductId::Text(s)
  }
}

/// The `(productId, size, color)` triple that identifies a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
  pub product_id: ProductId,
  pub size: Option<String>,
  pub color: Option<String>,
}

impl LineKey {
  pub fn new(product_id: impl Into<ProductId>, size: Option<String>, color: Option<String>) -> Self {
    Self {
      product_id: product_id.into(),
      size,
      color,
    }
  }

  pub fn matches(&self, item: &CartLineItem) -> bool {
    item.product_id == self.product_id && item.size == self.size && item.color == self.color
  }
}

impl fmt::Display for LineKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}/{}/{}",
      self.product_id,
      self.size.as_deref().unwrap_or("-"),
      self.color.as_deref().unwrap_or("-")
    )
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
  pub product_id: ProductId,
  /// Product data as it looked when the item was added. Never re-validated.
  #[serde(default)]
  pub product: Value,
  pub quantity: u32,
  #[serde(default)]
  pub size: Option<String>,
  #[serde(default)]
  pub color: Option<String>,
  #[serde(deserialize_with = "deserialize_price")]
  pub price: f64,
}

impl CartLineItem {
  /// Builds a line item from a catalog product snapshot.
  pub fn from_product(
    product: &Value,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
  ) -> CartResult<Self> {
    let product_id = ProductId::from_snapshot(product)
      .ok_or_else(|| CartError::InvalidProduct("snapshot has neither `id` nor `_id`".to_string()))?;
    let price = product
      .get("price")
      .and_then(parse_price)
      .ok_or_else(|| CartError::InvalidProduct(format!("product {} has no numeric `price`", product_id)))?;

    Ok(Self {
      product_id,
      product: product.clone(),
      quantity,
      size,
      color,
      price,
    })
  }

  pub fn key(&self) -> LineKey {
    LineKey {
      product_id: self.product_id.clone(),
      size: self.size.clone(),
      color: self.color.clone(),
    }
  }

  pub fn line_total(&self) -> f64 {
    self.price * f64::from(self.quantity)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn id_falls_back_to_underscore_id() {
    let product = json!({ "_id": "abc", "price": 10 });
    assert_eq!(ProductId::from_snapshot(&product), Some(ProductId::Text("abc".into())));
    let product = json!({ "id": null, "_id": 7, "price": 10 });
    assert_eq!(ProductId::from_snapshot(&product), Some(ProductId::Number(7)));
  }

  #[test]
  fn unset_id_values_fall_back_to_underscore_id() {
    let zero = json!({ "id": 0, "_id": "mongo-1" });
    assert_eq!(ProductId::from_snapshot(&zero), Some(ProductId::Text("mongo-1".into())));
    let empty = json!({ "id": "", "_id": 9 });
    assert_eq!(ProductId::from_snapshot(&empty), Some(ProductId::Number(9)));
    assert_eq!(ProductId::from_snapshot(&json!({ "id": 0 })), None);
    assert_eq!(ProductId::from_snapshot(&json!({ "id": 1.5 })), None);
  }

  #[test]
  fn numeric_and_text_ids_differ() {
    assert_ne!(ProductId::from(1), ProductId::from("1"));
  }

  #[test]
  fn from_product_captures_price_and_snapshot() {
    let product = json!({ "id": 3, "name": "Shirt", "price": "19.5" });
    let item = CartLineItem::from_product(&product, 2, Some("M".into()), None).unwrap();
    assert_eq!(item.product_id, ProductId::Number(3));
    assert_eq!(item.price, 19.5);
    assert_eq!(item.line_total(), 39.0);
    assert_eq!(item.product["name"], "Shirt");
  }

  #[test]
  fn from_product_rejects_missing_price() {
    let product = json!({ "id": 3 });
    assert!(matches!(
      CartLineItem::from_product(&product, 1, None, None),
      Err(CartError::InvalidProduct(_))
    ));
  }

  #[test]
  fn stored_line_accepts_string_price() {
    let item: CartLineItem = serde_json::from_value(json!({
      "productId": 4, "product": {}, "quantity": 2, "price": "19.99"
    }))
    .unwrap();
    assert_eq!(item.price, 19.99);
    let bad = serde_json::from_value::<CartLineItem>(json!({ "productId": 4, "quantity": 1, "price": "free" }));
    assert!(bad.is_err());
  }

  #[test]
  fn serialises_with_camel_case_and_null_variants() {
    let item = CartLineItem::from_product(&json!({ "id": "p1", "price": 5 }), 1, None, Some("red".into())).unwrap();
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["productId"], "p1");
    assert!(value["size"].is_null());
    assert_eq!(value["color"], "red");
  }
}
