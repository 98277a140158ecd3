use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LintError {
    #[error("Start element '{0}' is not a FROM element of the query")]
    StartNotInFroms(String),
}
