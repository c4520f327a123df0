// restoration-server/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::PaymentIntentRequest;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PaymentSuccessPayload {
  pub payment_intent_id: Option<String>,
}

#[instrument(name = "handler::create_payment_intent", skip(app_state), fields(order_id = %order_id))]
pub async fn create_payment_intent_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.lifecycle.find_order(&order_id).await?;
  let request = PaymentIntentRequest::for_order(&order, &app_state.config.payment_currency);

  let intent = app_state.payments.create_intent(request).await?;
  app_state
    .lifecycle
    .attach_payment_intent(order.order_id().as_str(), intent.id.clone())
    .await?;
  info!(payment_intent_id = %intent.id, amount = intent.amount, "Payment intent created.");

  Ok(HttpResponse::Ok().json(json!({
    "client_secret": intent.client_secret,
    "payment_intent_id": intent.id,
    "amount": intent.amount,
    "currency": intent.currency,
  })))
}

/// The body is optional; a missing or unparsable one records no intent ID.
#[instrument(name = "handler::payment_success", skip(app_state, payload), fields(order_id = %order_id))]
pub async fn payment_success_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<String>,
  payload: Option<web::Json<PaymentSuccessPayload>>,
) -> Result<HttpResponse, AppError> {
  let payment_intent_id = payload.and_then(|p| p.into_inner().payment_intent_id);
  let order = app_state.lifecycle.mark_paid(&order_id, payment_intent_id).await?;
  info!(status = %order.status(), "Payment recorded.");

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Payment recorded successfully",
    "order_id": order.order_id(),
  })))
}
