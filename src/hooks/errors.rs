use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Backend error: {0}")]
    Backend(String),
}
