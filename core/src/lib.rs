// restoration-core/src/lib.rs

//! Domain core of the restoration order service.
//!
//! - `order`: the order model, its persisted record and outward views.
//! - `store`: one JSON snapshot per order, last write wins.
//! - `lifecycle`: creation, upload binding and payment transitions.
//! - `binder`: validation and storage of uploaded media files.
//! - `flow`: the step workflow engine the lifecycle runs on.

pub mod binder;
pub mod error;
pub mod flow;
pub mod lifecycle;
pub mod order;
pub mod store;

pub use crate::binder::{sanitize_filename, FileBinder, LocatedFile, StoredFile, UploadPolicy};
pub use crate::error::{FlowError, OrderError, OrderResult, StoreError};
pub use crate::flow::{Control, Ctx, Outcome, Workflow, WorkflowRegistry};
pub use crate::lifecycle::OrderLifecycle;
pub use crate::order::{
  CustomerDetails, FileMetadata, NewOrder, Order, OrderId, OrderRecord, OrderStatus, OrderSummary, OrderView,
};
pub use crate::store::{JsonFileStore, MemoryStore, RecordStore};
