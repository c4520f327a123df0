// restoration-core/src/flow/registry.rs

//! A registry of workflows keyed by the type of context they run on.

use crate::error::FlowError;
use crate::flow::control::Outcome;
use crate::flow::ctx::Ctx;
use crate::flow::workflow::Workflow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedRunner<Err>: Send + Sync
where
  Err: std::error::Error + Send + Sync + 'static,
{
  /// `ctx` must be a boxed `Ctx<TData>` for the wrapped workflow's `TData`.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, Err>;
}

struct Registered<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  workflow: Workflow<TData, Err>,
}

#[async_trait]
impl<TData, Err> ErasedRunner<Err> for Registered<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, Err> {
    let typed = ctx.downcast::<Ctx<TData>>().map_err(|_| {
      Err::from(FlowError::TypeMismatch {
        expected_type: std::any::type_name::<Ctx<TData>>().to_string(),
      })
    })?;
    self.workflow.run(*typed).await
  }
}

/// Holds at most one workflow per context type and dispatches runs by type.
pub struct WorkflowRegistry<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  workflows: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<Err>>>>,
}

impl<Err> WorkflowRegistry<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      workflows: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `workflow` for its context type, replacing any earlier one.
  pub fn register<TData>(&self, workflow: Workflow<TData, Err>)
  where
    TData: 'static + Send + Sync,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<TData>(), steps = ?workflow.step_names(), "Registering workflow.");
    self
      .workflows
      .write()
      .insert(TypeId::of::<TData>(), Arc::new(Registered { workflow }));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.workflows.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the workflow registered for `TData` against `ctx`.
  pub async fn run<TData>(&self, ctx: Ctx<TData>) -> Result<Outcome, Err>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.workflows.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let context_type = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %context_type, "No workflow registered for context type.");
      Err::from(FlowError::NotRegistered { context_type })
    })?;

    runner.run_erased(Box::new(ctx)).await
  }
}

impl<Err> Default for WorkflowRegistry<Err>
where
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
