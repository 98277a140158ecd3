use serde::{Deserialize, Serialize};

use crate::query::Statement;

use super::errors::ExecutionError;
use super::registry::HookRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// The database-facing side of an [`Engine`].
#[cfg_attr(test, mockall::automock)]
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecutionError>;
}

/// Dispatches statements to an executor, firing the registered
/// before-execute hooks first.
pub struct Engine<E> {
    executor: E,
    hooks: HookRegistry,
}

impl<E: QueryExecutor> Engine<E> {
    pub fn new(executor: E) -> Self {
        Engine {
            executor,
            hooks: HookRegistry::new(),
        }
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecutionError> {
        self.hooks.fire(statement);
        self.executor.execute(statement)
    }
}
