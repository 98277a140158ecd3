use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("Column '{column}' is not defined on '{source_name}'")]
    UnknownColumn { source_name: String, column: String },
}
