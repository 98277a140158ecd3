//! In-memory query representation consumed by the linter.
//!
//! This is the builder-side view of a SELECT: sources with identity, join
//! trees, expression trees and the rules that derive a select's FROM list.
//! Nothing here executes anything.

pub mod errors;
mod expr;
mod select;
mod source;
mod to_sql;
pub mod visitor;

pub use errors::QueryError;
pub use expr::{BinaryOperator, ColumnRef, Expr, Literal};
pub use select::{Select, SelectItem, Statement};
pub use source::{FromSource, Join, JoinKind, Joinable, SourceId, SourceRef, Subquery, Table};
pub use to_sql::ToSql;
pub(crate) use to_sql::Renderer;
