// restoration-core/src/flow/workflow.rs

//! The `Workflow<TData, Err>` type: an ordered list of named steps, the handlers
//! registered for them, and the executor that runs them against a `Ctx<TData>`.

use crate::error::FlowError;
use crate::flow::control::{Control, Outcome};
use crate::flow::ctx::Ctx;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{event, instrument, span, Instrument, Level};

/// A boxed async step handler.
///
/// Handlers receive a clone of the run's `Ctx<TData>` and must release any
/// lock guard before awaiting.
pub type Handler<TData, Err> =
  Box<dyn Fn(Ctx<TData>) -> Pin<Box<dyn Future<Output = Result<Control, Err>> + Send>> + Send + Sync>;

/// Predicate evaluated before a step runs. Returning true skips the step.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}

pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  steps: Vec<StepDef<TData>>,
  on: HashMap<String, Vec<Handler<TData, Err>>>,
  after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a workflow from `(name, optional, skip_if)` step definitions.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Panics when `step_name` is not defined: wiring a handler to a missing step
  /// is a setup bug, not a runtime condition.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("workflow setup error: step '{}' is not defined", step_name);
    }
  }

  /// Registers the main handler(s) of a step.
  pub fn on_step<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(Ctx<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .on
      .entry(step_name.to_string())
      .or_default()
      .push(box_handler(handler_fn));
  }

  /// Registers a handler that runs once the `on` handlers of the step succeeded.
  pub fn after_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(Ctx<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .after
      .entry(step_name.to_string())
      .or_default()
      .push(box_handler(handler_fn));
  }

  /// Executes every step in order against `ctx`.
  ///
  /// Returns `Outcome::Stopped` as soon as a handler asks to stop and the first
  /// handler error otherwise. A non-optional step with no handlers is a
  /// `FlowError::HandlerMissing`.
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: Ctx<TData>) -> Result<Outcome, Err> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        let skip = {
          let guard = ctx.read();
          skip_if(&guard)
        };
        if skip {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let on_handlers = self.on.get(step_name).filter(|v| !v.is_empty());
      let after_handlers = self.after.get(step_name).filter(|v| !v.is_empty());

      if on_handlers.is_none() && after_handlers.is_none() {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = span!(Level::DEBUG, "workflow_step", step_name, step_index = step_idx);

      for (phase, handlers) in [("on", on_handlers), ("after", after_handlers)] {
        let Some(handlers) = handlers else { continue };
        for handler in handlers {
          match handler(ctx.clone()).instrument(step_span.clone()).await {
            Ok(Control::Continue) => {}
            Ok(Control::Stop) => {
              event!(Level::INFO, step = step_name, phase, "Workflow stopped by a handler.");
              return Ok(Outcome::Stopped);
            }
            Err(e) => {
              event!(Level::WARN, step = step_name, phase, error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
    }

    Ok(Outcome::Completed)
  }
}

fn box_handler<TData, Err, F, UserErr>(handler_fn: impl Fn(Ctx<TData>) -> F + Send + Sync + 'static) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<Control, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx| {
    let user_fut = handler_fn(ctx);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}
