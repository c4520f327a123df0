// restoration-core/src/flow/mod.rs

//! A small async step engine. Order operations are expressed as workflows of
//! named steps over a shared context, registered once and dispatched by
//! context type.

pub mod control;
pub mod ctx;
pub mod registry;
pub mod workflow;

pub use control::{Control, Outcome};
pub use ctx::Ctx;
pub use registry::WorkflowRegistry;
pub use workflow::{Handler, SkipCondition, StepDef, Workflow};
