// restoration-server/src/web/handlers/system_handlers.rs

use crate::web::routes::ROUTES;
use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;

pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "healthy", "timestamp": Utc::now().to_rfc3339() }))
}

pub async fn route_listing_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "message": "Test endpoint working", "routes": ROUTES }))
}
