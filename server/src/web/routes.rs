// restoration-server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{order_handlers, payment_handlers, system_handlers, upload_handlers};
use actix_web::{error::JsonPayloadError, web, HttpRequest};

/// Every route the service exposes, as reported by `GET /test`.
pub const ROUTES: &[&str] = &[
  "/health",
  "/test",
  "/api/create-order",
  "/api/upload",
  "/api/upload-file/{order_id}",
  "/api/order/{order_id}",
  "/api/orders",
  "/api/create-payment-intent/{order_id}",
  "/api/payment-success/{order_id}",
  "/api/download/{file_id}",
];

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/health", web::get().to(system_handlers::health_handler))
    .route("/test", web::get().to(system_handlers::route_listing_handler))
    .service(
      web::scope("/api")
        .route("/create-order", web::post().to(order_handlers::create_order_handler))
        .route("/order/{order_id}", web::get().to(order_handlers::get_order_handler))
        .route("/orders", web::get().to(order_handlers::list_orders_handler))
        .route("/upload", web::post().to(upload_handlers::upload_unbound_handler))
        .route("/upload-file/{order_id}", web::post().to(upload_handlers::upload_for_order_handler))
        .route("/download/{file_id}", web::get().to(upload_handlers::download_handler))
        .route(
          "/create-payment-intent/{order_id}",
          web::post().to(payment_handlers::create_payment_intent_handler),
        )
        .route(
          "/payment-success/{order_id}",
          web::post().to(payment_handlers::payment_success_handler),
        ),
    );
}
