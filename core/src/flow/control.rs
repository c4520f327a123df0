// restoration-core/src/flow/control.rs

/// Returned by a handler to continue with the workflow or halt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
  Continue,
  /// Halt the workflow. Remaining handlers and steps are not executed.
  Stop,
}

/// How a whole workflow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Completed,
  /// A handler returned `Control::Stop`.
  Stopped,
}
