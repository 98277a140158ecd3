//! FROM-able sources: tables, table aliases, derived subqueries and join trees.
//!
//! Every table, alias and subquery carries a [`SourceId`] minted when it is
//! constructed. Handles are cheap to clone and compare by that identity, so two
//! references to the same underlying source are the same FROM element while two
//! separately-built tables that merely share a name are not.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

use super::errors::QueryError;
use super::expr::{ColumnRef, Expr};
use super::select::Select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(Uuid);

impl SourceId {
    fn new() -> Self {
        SourceId(Uuid::new_v4())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct TableInner {
    id: SourceId,
    name: String,
    /// Set when this table is an alias of another one.
    base_name: Option<String>,
    columns: Vec<String>,
}

/// A base table (or an alias of one).
#[derive(Debug, Clone)]
pub struct Table(Arc<TableInner>);

impl Table {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table(Arc::new(TableInner {
            id: SourceId::new(),
            name: name.into(),
            base_name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }))
    }

    /// Alias this table under a new name. The alias is a distinct FROM element,
    /// which is what makes self-joins expressible.
    pub fn alias(&self, name: impl Into<String>) -> Table {
        Table(Arc::new(TableInner {
            id: SourceId::new(),
            name: name.into(),
            base_name: Some(self.base_name().to_string()),
            columns: self.0.columns.clone(),
        }))
    }

    pub fn id(&self) -> SourceId {
        self.0.id
    }

    /// Name this source is referenced by in the query (the alias, if any).
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name of the underlying table.
    pub fn base_name(&self) -> &str {
        self.0.base_name.as_deref().unwrap_or(&self.0.name)
    }

    pub fn is_alias(&self) -> bool {
        self.0.base_name.is_some()
    }

    pub fn columns(&self) -> &[String] {
        &self.0.columns
    }

    pub fn column(&self, name: &str) -> Result<Expr, QueryError> {
        if !self.0.columns.iter().any(|c| c == name) {
            return Err(QueryError::UnknownColumn {
                source_name: self.name().to_string(),
                column: name.to_string(),
            });
        }
        Ok(Expr::Column(ColumnRef::new(
            SourceRef::Table(self.clone()),
            name,
        )))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Table {}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[derive(Debug)]
struct SubqueryInner {
    id: SourceId,
    name: String,
    select: Select,
    columns: Vec<String>,
    lateral: bool,
}

/// A SELECT used as a FROM source (a derived table).
///
/// Predicates inside the subquery belong to its own scope. From the outside it
/// is a single opaque element whose output columns can be referenced.
#[derive(Debug, Clone)]
pub struct Subquery(Arc<SubqueryInner>);

impl Subquery {
    pub(crate) fn new(select: Select, name: impl Into<String>, lateral: bool) -> Self {
        let columns = select.output_columns();
        Subquery(Arc::new(SubqueryInner {
            id: SourceId::new(),
            name: name.into(),
            select,
            columns,
            lateral,
        }))
    }

    pub fn id(&self) -> SourceId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn select(&self) -> &Select {
        &self.0.select
    }

    /// Lateral subqueries may reference sibling FROM elements of the query
    /// they appear in.
    pub fn is_lateral(&self) -> bool {
        self.0.lateral
    }

    pub fn columns(&self) -> &[String] {
        &self.0.columns
    }

    pub fn column(&self, name: &str) -> Result<Expr, QueryError> {
        if !self.0.columns.iter().any(|c| c == name) {
            return Err(QueryError::UnknownColumn {
                source_name: self.name().to_string(),
                column: name.to_string(),
            });
        }
        Ok(Expr::Column(ColumnRef::new(
            SourceRef::Subquery(self.clone()),
            name,
        )))
    }
}

impl PartialEq for Subquery {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Subquery {}

impl Hash for Subquery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// An atomic FROM element: something a column reference can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceRef {
    Table(Table),
    Subquery(Subquery),
}

impl SourceRef {
    pub fn id(&self) -> SourceId {
        match self {
            SourceRef::Table(table) => table.id(),
            SourceRef::Subquery(subquery) => subquery.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SourceRef::Table(table) => table.name(),
            SourceRef::Subquery(subquery) => subquery.name(),
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            SourceRef::Table(table) => table.columns(),
            SourceRef::Subquery(subquery) => subquery.columns(),
        }
    }

    pub fn as_subquery(&self) -> Option<&Subquery> {
        match self {
            SourceRef::Subquery(subquery) => Some(subquery),
            SourceRef::Table(_) => None,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Table> for SourceRef {
    fn from(table: Table) -> Self {
        SourceRef::Table(table)
    }
}

impl From<&Table> for SourceRef {
    fn from(table: &Table) -> Self {
        SourceRef::Table(table.clone())
    }
}

impl From<Subquery> for SourceRef {
    fn from(subquery: Subquery) -> Self {
        SourceRef::Subquery(subquery)
    }
}

impl From<&Subquery> for SourceRef {
    fn from(subquery: &Subquery) -> Self {
        SourceRef::Subquery(subquery.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// One join step of a join tree. Either side may itself be a join.
#[derive(Debug, Clone)]
pub struct Join {
    left: Box<FromSource>,
    right: Box<FromSource>,
    kind: JoinKind,
    on: Option<Expr>,
}

impl Join {
    pub fn left(&self) -> &FromSource {
        &self.left
    }

    pub fn right(&self) -> &FromSource {
        &self.right
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    /// The ON condition. Cross joins have none.
    pub fn on(&self) -> Option<&Expr> {
        self.on.as_ref()
    }
}

/// A top-level FROM entry.
#[derive(Debug, Clone)]
pub enum FromSource {
    Table(Table),
    Subquery(Subquery),
    Join(Join),
}

impl FromSource {
    /// Atomic sources of this entry, left to right.
    pub fn leaves(&self) -> Vec<SourceRef> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<SourceRef>) {
        match self {
            FromSource::Table(table) => leaves.push(SourceRef::Table(table.clone())),
            FromSource::Subquery(subquery) => {
                leaves.push(SourceRef::Subquery(subquery.clone()))
            }
            FromSource::Join(join) => {
                join.left.collect_leaves(leaves);
                join.right.collect_leaves(leaves);
            }
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self, FromSource::Join(_))
    }
}

impl From<Table> for FromSource {
    fn from(table: Table) -> Self {
        FromSource::Table(table)
    }
}

impl From<&Table> for FromSource {
    fn from(table: &Table) -> Self {
        FromSource::Table(table.clone())
    }
}

impl From<Subquery> for FromSource {
    fn from(subquery: Subquery) -> Self {
        FromSource::Subquery(subquery)
    }
}

impl From<&Subquery> for FromSource {
    fn from(subquery: &Subquery) -> Self {
        FromSource::Subquery(subquery.clone())
    }
}

impl From<SourceRef> for FromSource {
    fn from(source: SourceRef) -> Self {
        match source {
            SourceRef::Table(table) => FromSource::Table(table),
            SourceRef::Subquery(subquery) => FromSource::Subquery(subquery),
        }
    }
}

/// Join builders shared by everything that can appear in a FROM clause.
pub trait Joinable: Clone + Into<FromSource> {
    fn join(&self, right: impl Into<FromSource>, on: Expr) -> FromSource {
        self.join_with(right, JoinKind::Inner, Some(on))
    }

    fn outer_join(&self, right: impl Into<FromSource>, on: Expr) -> FromSource {
        self.join_with(right, JoinKind::LeftOuter, Some(on))
    }

    fn right_join(&self, right: impl Into<FromSource>, on: Expr) -> FromSource {
        self.join_with(right, JoinKind::RightOuter, Some(on))
    }

    fn full_join(&self, right: impl Into<FromSource>, on: Expr) -> FromSource {
        self.join_with(right, JoinKind::FullOuter, Some(on))
    }

    fn cross_join(&self, right: impl Into<FromSource>) -> FromSource {
        self.join_with(right, JoinKind::Cross, None)
    }

    fn join_with(
        &self,
        right: impl Into<FromSource>,
        kind: JoinKind,
        on: Option<Expr>,
    ) -> FromSource {
        FromSource::Join(Join {
            left: Box::new(self.clone().into()),
            right: Box::new(right.into()),
            kind,
            on: if kind == JoinKind::Cross { None } else { on },
        })
    }
}

impl Joinable for Table {}
impl Joinable for Subquery {}
impl Joinable for FromSource {}
