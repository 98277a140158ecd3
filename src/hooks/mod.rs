//! Pre-execution hooks and the engine that fires them.
//!
//! The cartesian check is one such hook. Install it on an [`Engine`]'s
//! registry to have every outgoing select linted before dispatch.

mod cartesian;
mod engine;
pub mod errors;
mod registry;

pub use cartesian::{CartesianLintHook, CollectingSink, LogSink, WarningSink};
pub use engine::{Engine, QueryExecutor, QueryResult, Value};
pub use errors::ExecutionError;
pub use registry::{BeforeExecute, HookId, HookRegistry};
