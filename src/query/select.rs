use std::collections::HashSet;

use super::expr::Expr;
use super::source::{FromSource, SourceId, SourceRef, Subquery};
use super::visitor::{ColumnOwners, ExprVisitor};

#[derive(Debug, Clone)]
pub enum SelectItem {
    Expr { expr: Expr, label: Option<String> },
    /// `source.*`
    AllColumns(SourceRef),
}

#[derive(Debug, Clone, Default)]
pub struct Select {
    items: Vec<SelectItem>,
    from: Vec<FromSource>,
    where_clause: Option<Expr>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, expr: impl Into<Expr>) -> Self {
        self.items.push(SelectItem::Expr {
            expr: expr.into(),
            label: None,
        });
        self
    }

    pub fn column_as(mut self, expr: impl Into<Expr>, label: impl Into<String>) -> Self {
        self.items.push(SelectItem::Expr {
            expr: expr.into(),
            label: Some(label.into()),
        });
        self
    }

    pub fn all_from(mut self, source: impl Into<SourceRef>) -> Self {
        self.items.push(SelectItem::AllColumns(source.into()));
        self
    }

    /// Add an explicit FROM entry.
    pub fn select_from(mut self, source: impl Into<FromSource>) -> Self {
        self.from.push(source.into());
        self
    }

    /// Add a WHERE condition; repeated calls are AND-ed together.
    pub fn where_(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    pub fn explicit_froms(&self) -> &[FromSource] {
        &self.from
    }

    pub fn where_clause(&self) -> Option<&Expr> {
        self.where_clause.as_ref()
    }

    /// Wrap this select as a derived table.
    pub fn subquery(self, name: impl Into<String>) -> Subquery {
        Subquery::new(self, name, false)
    }

    /// Wrap this select as a LATERAL derived table.
    pub fn lateral(self, name: impl Into<String>) -> Subquery {
        Subquery::new(self, name, true)
    }

    /// Names of the columns this select produces when used as a subquery.
    /// Unlabelled expressions other than plain columns produce no name.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for item in &self.items {
            match item {
                SelectItem::Expr {
                    label: Some(label), ..
                } => columns.push(label.clone()),
                SelectItem::Expr {
                    expr: Expr::Column(column),
                    label: None,
                } => columns.push(column.name().to_string()),
                SelectItem::Expr { .. } => {}
                SelectItem::AllColumns(source) => {
                    columns.extend(source.columns().iter().cloned())
                }
            }
        }
        columns
    }

    /// The top-level FROM list of a standalone select.
    pub fn froms(&self) -> Vec<FromSource> {
        self.froms_in(&HashSet::new())
    }

    /// The FROM list of this select when nested inside queries whose sources
    /// are `enclosing`.
    ///
    /// Explicit entries come first in declaration order, followed by every
    /// source the select list or WHERE clause references that no explicit
    /// entry covers, in order of first reference. Referenced sources visible
    /// in `enclosing` are correlated rather than added, unless that would
    /// leave the select with no FROM at all.
    pub fn froms_in(&self, enclosing: &HashSet<SourceId>) -> Vec<FromSource> {
        let mut froms = self.from.clone();
        let mut covered: HashSet<SourceId> = froms
            .iter()
            .flat_map(|from| from.leaves())
            .map(|source| source.id())
            .collect();

        let mut implicit = Vec::new();
        let mut correlated = Vec::new();
        for source in self.referenced_sources() {
            if !covered.insert(source.id()) {
                continue;
            }
            if enclosing.contains(&source.id()) {
                correlated.push(source);
            } else {
                implicit.push(source);
            }
        }

        if froms.is_empty() && implicit.is_empty() {
            implicit = correlated;
        }

        froms.extend(implicit.into_iter().map(FromSource::from));
        froms
    }

    /// Sources referenced directly by the select list and WHERE clause.
    fn referenced_sources(&self) -> Vec<SourceRef> {
        let mut owners = ColumnOwners::new();
        for item in &self.items {
            match item {
                SelectItem::Expr { expr, .. } => owners.visit_expr(expr),
                SelectItem::AllColumns(source) => owners.add(source),
            }
        }
        if let Some(where_clause) = &self.where_clause {
            owners.visit_expr(where_clause);
        }
        owners.into_owners()
    }
}

/// Anything that can be handed to an engine for execution.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(Select),
    /// Raw SQL text; opaque to analysis.
    Text(String),
}

impl From<Select> for Statement {
    fn from(select: Select) -> Self {
        Statement::Select(select)
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::Text(sql.to_string())
    }
}
