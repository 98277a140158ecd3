//! Predicates and the sources they touch.
//!
//! A predicate touches every source whose columns it references, resolved
//! against a [`Scope`]. Columns inside a nested select count only when they
//! reach out of that select into the scope (correlation); the nested select's
//! own sources stay inside it.

use std::collections::{BTreeSet, HashSet};

use crate::query::visitor::ExprVisitor;
use crate::query::{ColumnRef, Expr, FromSource, Select, SelectItem, SourceId, SourceRef};

use super::graph::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOrigin {
    /// ON condition of a join step.
    JoinCondition,
    /// Top-level conjunct of the WHERE clause.
    Where,
    /// Reference from inside a lateral subquery to its siblings.
    Correlation,
}

#[derive(Debug, Clone)]
pub struct Predicate {
    origin: PredicateOrigin,
    elements: BTreeSet<ElementId>,
}

impl Predicate {
    pub(crate) fn new(origin: PredicateOrigin, elements: BTreeSet<ElementId>) -> Self {
        Predicate { origin, elements }
    }

    pub fn origin(&self) -> PredicateOrigin {
        self.origin
    }

    pub fn elements(&self) -> &BTreeSet<ElementId> {
        &self.elements
    }

    /// Whether this predicate joins anything. Zero- and one-element predicates
    /// are plain filters.
    pub fn is_edge(&self) -> bool {
        self.elements.len() >= 2
    }
}

/// Sources visible at one query level: its own FROM leaves plus everything
/// visible in the queries enclosing it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    sources: Vec<SourceRef>,
    ids: HashSet<SourceId>,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A child scope that additionally sees `sources`.
    pub(crate) fn with(&self, sources: impl IntoIterator<Item = SourceRef>) -> Scope {
        let mut scope = self.clone();
        for source in sources {
            if scope.ids.insert(source.id()) {
                scope.sources.push(source);
            }
        }
        scope
    }

    /// The same scope with one source hidden.
    pub(crate) fn without(&self, id: SourceId) -> Scope {
        Scope {
            sources: self
                .sources
                .iter()
                .filter(|s| s.id() != id)
                .cloned()
                .collect(),
            ids: self.ids.iter().copied().filter(|i| *i != id).collect(),
        }
    }

    pub(crate) fn contains(&self, id: SourceId) -> bool {
        self.ids.contains(&id)
    }

    pub(crate) fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    pub(crate) fn ids(&self) -> &HashSet<SourceId> {
        &self.ids
    }
}

/// Collects the in-scope sources an expression touches.
pub(crate) struct TouchCollector<'s> {
    scope: &'s Scope,
    touched: BTreeSet<SourceId>,
}

impl<'s> TouchCollector<'s> {
    pub(crate) fn new(scope: &'s Scope) -> Self {
        TouchCollector {
            scope,
            touched: BTreeSet::new(),
        }
    }

    pub(crate) fn into_touched(self) -> BTreeSet<SourceId> {
        self.touched
    }
}

impl ExprVisitor for TouchCollector<'_> {
    fn visit_column(&mut self, column: &ColumnRef) {
        let id = column.owner().id();
        if self.scope.contains(id) {
            self.touched.insert(id);
        }
    }

    fn visit_subquery(&mut self, select: &Select) {
        self.touched.extend(correlated_refs(select, self.scope));
    }
}

/// Sources an expression touches within `scope`.
pub(crate) fn touched_sources(expr: &Expr, scope: &Scope) -> BTreeSet<SourceId> {
    let mut collector = TouchCollector::new(scope);
    collector.visit_expr(expr);
    collector.into_touched()
}

/// Sources of `scope` referenced from anywhere inside `select`, excluding the
/// ones `select` has in its own FROM list (those shadow the enclosing ones).
pub(crate) fn correlated_refs(select: &Select, scope: &Scope) -> BTreeSet<SourceId> {
    let froms = select.froms_in(scope.ids());
    let own: Vec<SourceRef> = froms.iter().flat_map(|f| f.leaves()).collect();
    let own_ids: HashSet<SourceId> = own.iter().map(|s| s.id()).collect();
    let inner = scope.with(own.iter().cloned());

    let mut collector = TouchCollector::new(&inner);
    for item in select.items() {
        match item {
            SelectItem::Expr { expr, .. } => collector.visit_expr(expr),
            SelectItem::AllColumns(source) => {
                if inner.contains(source.id()) {
                    collector.touched.insert(source.id());
                }
            }
        }
    }
    if let Some(where_clause) = select.where_clause() {
        collector.visit_expr(where_clause);
    }
    for from in &froms {
        visit_join_conditions(from, &mut collector);
    }
    let mut touched = collector.into_touched();

    for source in &own {
        if let Some(subquery) = source.as_subquery().filter(|s| s.is_lateral()) {
            touched.extend(correlated_refs(subquery.select(), &inner.without(subquery.id())));
        }
    }

    touched.retain(|id| !own_ids.contains(id));
    touched
}

fn visit_join_conditions(from: &FromSource, visitor: &mut impl ExprVisitor) {
    if let FromSource::Join(join) = from {
        visit_join_conditions(join.left(), visitor);
        visit_join_conditions(join.right(), visitor);
        if let Some(on) = join.on() {
            visitor.visit_expr(on);
        }
    }
}

/// Split a WHERE clause at AND boundaries, flattening nested ANDs. Anything
/// else, OR groups included, stays a single conjunct.
pub(crate) fn split_conjuncts(expr: &Expr) -> Vec<&Expr> {
    let mut conjuncts = Vec::new();
    collect_conjuncts(expr, &mut conjuncts);
    conjuncts
}

fn collect_conjuncts<'e>(expr: &'e Expr, conjuncts: &mut Vec<&'e Expr>) {
    match expr {
        Expr::And(terms) => {
            for term in terms {
                collect_conjuncts(term, conjuncts);
            }
        }
        other => conjuncts.push(other),
    }
}
