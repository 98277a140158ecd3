//! Expression tree traversal.
//!
//! [`walk_expr`] matches every [`Expr`] variant, so adding a variant fails to
//! compile until traversal accounts for it. Nested selects are handed to
//! [`ExprVisitor::visit_subquery`] and never descended into here: whether a
//! column inside a subquery counts at the enclosing level depends on scoping,
//! which only the visitor knows.

use std::collections::HashSet;

use super::expr::{ColumnRef, Expr};
use super::select::Select;
use super::source::{SourceId, SourceRef};

pub trait ExprVisitor {
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_column(&mut self, _column: &ColumnRef) {}

    fn visit_subquery(&mut self, _select: &Select) {}
}

pub fn walk_expr<V: ExprVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Column(column) => visitor.visit_column(column),
        Expr::Literal(_) | Expr::Parameter(_) => {}
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::And(terms) | Expr::Or(terms) => {
            for term in terms {
                visitor.visit_expr(term);
            }
        }
        Expr::Not(inner) => visitor.visit_expr(inner),
        Expr::IsNull { expr, .. } => visitor.visit_expr(expr),
        Expr::InList { expr, list, .. } => {
            visitor.visit_expr(expr);
            for item in list {
                visitor.visit_expr(item);
            }
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(low);
            visitor.visit_expr(high);
        }
        Expr::Function { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Case {
            operand,
            when_then,
            else_expr,
        } => {
            if let Some(operand) = operand {
                visitor.visit_expr(operand);
            }
            for (when, then) in when_then {
                visitor.visit_expr(when);
                visitor.visit_expr(then);
            }
            if let Some(else_expr) = else_expr {
                visitor.visit_expr(else_expr);
            }
        }
        Expr::Cast { expr, .. } => visitor.visit_expr(expr),
        Expr::Exists(select) | Expr::ScalarSubquery(select) => visitor.visit_subquery(select),
        Expr::InSubquery { expr, subquery, .. } => {
            visitor.visit_expr(expr);
            visitor.visit_subquery(subquery);
        }
    }
}

/// Owners of the columns an expression references directly, in order of
/// first reference. Columns inside nested selects are not included.
#[derive(Debug, Default)]
pub struct ColumnOwners {
    seen: HashSet<SourceId>,
    owners: Vec<SourceRef>,
}

impl ColumnOwners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: &SourceRef) {
        if self.seen.insert(source.id()) {
            self.owners.push(source.clone());
        }
    }

    pub fn into_owners(self) -> Vec<SourceRef> {
        self.owners
    }
}

impl ExprVisitor for ColumnOwners {
    fn visit_column(&mut self, column: &ColumnRef) {
        self.add(column.owner());
    }
}
