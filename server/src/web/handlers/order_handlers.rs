// restoration-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use restoration_core::NewOrder;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::create_order", skip_all)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.lifecycle.create_order(payload.into_inner()).await?;
  info!(order_id = %order.order_id(), customer_email = %order.details.customer_email, "Created order.");

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "order_id": order.order_id(),
    "message": "Order created successfully",
  })))
}

#[instrument(name = "handler::get_order", skip(app_state), fields(order_id = %order_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let view = app_state.lifecycle.get_order(&order_id).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::list_orders", skip_all)]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.list_orders().await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
