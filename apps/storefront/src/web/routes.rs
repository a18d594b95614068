// apps/storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, catalog_handlers, register_handlers, session_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` (and the handler tests) to mount the gateway routes.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Session routes
      .service(
        web::scope("/session")
          .route("", web::post().to(session_handlers::create_session_handler))
          .route("", web::delete().to(session_handlers::end_session_handler))
          .route("/signin", web::post().to(session_handlers::sign_in_handler))
          .route("/signout", web::post().to(session_handlers::sign_out_handler)),
      )
      // Cart routes, all resolved through the X-Session-ID header
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_item_handler))
          .route("/items", web::patch().to(cart_handlers::update_item_handler))
          .route("/items", web::delete().to(cart_handlers::remove_item_handler))
          .route("/item", web::get().to(cart_handlers::lookup_item_handler)),
      )
      .route("/home", web::get().to(catalog_handlers::home_handler))
      .route("/products", web::get().to(catalog_handlers::list_products_handler))
      .route("/nav", web::get().to(catalog_handlers::nav_handler))
      .route("/register", web::post().to(register_handlers::register_handler)),
  );
}
