// restoration-core/src/lifecycle/workflows.rs

use crate::error::OrderError;
use crate::flow::{Control, Ctx, Workflow, WorkflowRegistry};
use crate::lifecycle::contexts::{CreateOrderCtx, OrderChange, OrderMutationCtx};
use crate::order::{CustomerDetails, NewOrder, Order, OrderId};
use crate::store::RecordStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Fresh IDs tried before creation gives up.
pub const MAX_ID_ATTEMPTS: usize = 8;

pub fn register_lifecycle_workflows(registry: &WorkflowRegistry<OrderError>, store: &Arc<dyn RecordStore>) {
  registry.register(create_order_workflow(store));
  registry.register(order_mutation_workflow(store));
}

pub fn create_order_workflow(store: &Arc<dyn RecordStore>) -> Workflow<CreateOrderCtx, OrderError> {
  let mut p = Workflow::<CreateOrderCtx, OrderError>::new(&[
    ("validate_submission", false, None),
    ("assign_order_id", false, None),
    ("persist_order", false, None),
  ]);

  p.on_step("validate_submission", |ctx: Ctx<CreateOrderCtx>| {
    Box::pin(async move {
      let details = {
        let guard = ctx.read();
        validate_submission(&guard.submission)
      };
      let details = details.map_err(|e| {
        warn!(error = %e, "Order submission rejected.");
        e
      })?;
      ctx.write().details = Some(details);
      Ok::<_, OrderError>(Control::Continue)
    })
  });

  let id_store = Arc::clone(store);
  p.on_step("assign_order_id", move |ctx: Ctx<CreateOrderCtx>| {
    let store = Arc::clone(&id_store);
    Box::pin(async move {
      for attempt in 1..=MAX_ID_ATTEMPTS {
        let candidate = OrderId::generate();
        if !store.exists(&candidate).await? {
          ctx.write().order_id = Some(candidate);
          return Ok::<_, OrderError>(Control::Continue);
        }
        warn!(order_id = %candidate, attempt, "Generated order ID already in use, retrying.");
      }
      Err(OrderError::Internal(format!(
        "no unused order ID after {} attempts",
        MAX_ID_ATTEMPTS
      )))
    })
  });

  let persist_store = Arc::clone(store);
  p.on_step("persist_order", move |ctx: Ctx<CreateOrderCtx>| {
    let store = Arc::clone(&persist_store);
    Box::pin(async move {
      let order = {
        let mut guard = ctx.write();
        let order_id = guard
          .order_id
          .take()
          .ok_or_else(|| OrderError::Internal("order ID was not assigned".to_string()))?;
        let details = guard
          .details
          .take()
          .ok_or_else(|| OrderError::Internal("submission was not validated".to_string()))?;
        Order::new(order_id, details, guard.created_at)
      };
      store.save(&order).await?;
      info!(order_id = %order.order_id(), service_type = %order.details.service_type, "Order created.");
      ctx.write().order = Some(order);
      Ok::<_, OrderError>(Control::Continue)
    })
  });

  p
}

pub fn order_mutation_workflow(store: &Arc<dyn RecordStore>) -> Workflow<OrderMutationCtx, OrderError> {
  let mut p = Workflow::<OrderMutationCtx, OrderError>::new(&[
    ("load_order", false, None),
    ("apply_change", false, None),
    ("persist_order", false, None),
  ]);

  let load_store = Arc::clone(store);
  p.on_step("load_order", move |ctx: Ctx<OrderMutationCtx>| {
    let store = Arc::clone(&load_store);
    Box::pin(async move {
      let order_id = ctx.read().order_id.clone();
      let order = store
        .load(&order_id)
        .await?
        .ok_or_else(|| OrderError::order_not_found(order_id.as_str()))?;
      ctx.write().order = Some(order);
      Ok::<_, OrderError>(Control::Continue)
    })
  });

  p.on_step("apply_change", |ctx: Ctx<OrderMutationCtx>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      let at = guard.at;
      let change = guard.change.clone();
      let order = guard
        .order
        .as_mut()
        .ok_or_else(|| OrderError::Internal("order was not loaded".to_string()))?;

      let changed = match change {
        OrderChange::AttachFile(file) => {
          order.attach_file(file, at);
          true
        }
        OrderChange::RecordPayment { payment_intent_id } => {
          order.record_payment(payment_intent_id, at);
          true
        }
        OrderChange::AttachIntent { payment_intent_id } => order.set_payment_intent(payment_intent_id),
      };
      guard.changed = changed;

      if changed {
        Ok::<_, OrderError>(Control::Continue)
      } else {
        Ok(Control::Stop)
      }
    })
  });

  let persist_store = Arc::clone(store);
  p.on_step("persist_order", move |ctx: Ctx<OrderMutationCtx>| {
    let store = Arc::clone(&persist_store);
    Box::pin(async move {
      let order = ctx
        .read()
        .order
        .clone()
        .ok_or_else(|| OrderError::Internal("order was not loaded".to_string()))?;
      store.save(&order).await?;
      Ok::<_, OrderError>(Control::Continue)
    })
  });

  p.after_step("persist_order", |ctx: Ctx<OrderMutationCtx>| {
    Box::pin(async move {
      let guard = ctx.read();
      if let Some(order) = &guard.order {
        info!(
          order_id = %order.order_id(),
          change = guard.change.name(),
          status = %order.status(),
          "Order updated."
        );
      }
      Ok::<_, OrderError>(Control::Continue)
    })
  });

  p
}

/// Checks a submission and turns it into customer details.
///
/// Missing fields are reported in the order email, name, service type, price.
pub fn validate_submission(submission: &NewOrder) -> Result<CustomerDetails, OrderError> {
  let customer_email = required_text("customer_email", submission.customer_email.as_deref())?;
  let customer_name = required_text("customer_name", submission.customer_name.as_deref())?;
  let service_type = required_text("service_type", submission.service_type.as_deref())?;
  let price = submission.price.ok_or_else(|| missing("price"))?;

  if !price.is_finite() || price < 0.0 {
    return Err(OrderError::Validation(
      "price must be a non-negative number".to_string(),
    ));
  }

  Ok(CustomerDetails {
    customer_email,
    customer_name,
    service_type,
    price,
    rush_delivery: submission.rush_delivery.unwrap_or(false),
  })
}

fn required_text(field: &str, value: Option<&str>) -> Result<String, OrderError> {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => Ok(v.to_string()),
    _ => Err(missing(field)),
  }
}

fn missing(field: &str) -> OrderError {
  OrderError::Validation(format!("Missing required field: {}", field))
}
