// apps/storefront/src/services/navigation.rs

use crate::models::views::{NavLink, NavView};

const LINKS: [(&str, &str); 4] = [("/", "Home"), ("/shop", "Shop"), ("/categories", "Categories"), ("/cart", "Cart")];

/// Home is active only on the exact root path; every other link is active
/// for its own path and anything below it.
fn is_active(href: &str, path: &str) -> bool {
  if href == "/" {
    path == "/"
  } else {
    path.starts_with(href)
  }
}

pub fn nav_view(path: &str, cart_count: u64) -> NavView {
  let links = LINKS
    .iter()
    .map(|&(href, label)| NavLink {
      href,
      label,
      active: is_active(href, path),
    })
    .collect();
  NavView { links, cart_count }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn active_labels(path: &str) -> Vec<&'static str> {
    nav_view(path, 0).links.into_iter().filter(|l| l.active).map(|l| l.label).collect()
  }

  #[test]
  fn home_only_on_root() {
    assert_eq!(active_labels("/"), vec!["Home"]);
    assert_eq!(active_labels("/about"), Vec::<&str>::new());
  }

  #[test]
  fn prefix_match_for_other_links() {
    assert_eq!(active_labels("/shop"), vec!["Shop"]);
    assert_eq!(active_labels("/shop/shoes/42"), vec!["Shop"]);
    assert_eq!(active_labels("/cart"), vec!["Cart"]);
  }

  #[test]
  fn carries_cart_count_and_link_order() {
    let view = nav_view("/categories", 7);
    assert_eq!(view.cart_count, 7);
    let hrefs: Vec<_> = view.links.iter().map(|l| l.href).collect();
    assert_eq!(hrefs, vec!["/", "/shop", "/categories", "/cart"]);
  }
}
