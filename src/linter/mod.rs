//! Cartesian product detection.
//!
//! A query's FROM elements form the nodes of a graph; predicates that touch
//! two or more elements connect them. Elements unreachable from the starting
//! element would be combined with the rest as a full cross product.
//!
//! ```
//! use cartesian_lint::linter::find_unmatching_froms;
//! use cartesian_lint::query::{Select, SourceRef, Table};
//!
//! let a = Table::new("table_a", ["col_a"]);
//! let b = Table::new("table_b", ["col_b"]);
//! let query = Select::new()
//!     .all_from(&a)
//!     .where_(b.column("col_b").unwrap().equals(5));
//!
//! let result = find_unmatching_froms(&query).unwrap();
//! assert_eq!(result.unmatched(), &[SourceRef::from(&b)]);
//! ```

use log::debug;

use crate::config::LinterConfig;
use crate::query::visitor::ExprVisitor;
use crate::query::{FromSource, Renderer, Select, SelectItem, SourceRef};

pub mod connectivity;
pub mod errors;
pub mod graph;
pub mod graph_builder;
pub mod predicate;
mod report;

pub use connectivity::{analyze, components, Connectivity};
pub use errors::LintError;
pub use graph::{ElementId, ElementRole, FromElement, FromGraph};
pub use graph_builder::{build_graph, GraphBuilder};
pub use predicate::{Predicate, PredicateOrigin};
pub use report::{summarize, LintReport};

use predicate::Scope;

pub type LintResult<T> = Result<T, LintError>;

/// Elements of `select` not joined up to its first FROM element.
pub fn find_unmatching_froms(select: &Select) -> LintResult<Connectivity> {
    analyze(&build_graph(select), None)
}

/// Elements of `select` not joined up to `start_with`.
pub fn find_unmatching_froms_from(
    select: &Select,
    start_with: impl Into<SourceRef>,
) -> LintResult<Connectivity> {
    let start = start_with.into();
    analyze(&build_graph(select), Some(&start))
}

/// Lints a select, and optionally every select nested in it, producing one
/// report per disconnected query level.
#[derive(Debug, Clone)]
pub struct Linter {
    lint_subqueries: bool,
    max_query_length: usize,
}

impl Linter {
    pub fn new(config: &LinterConfig) -> Self {
        Linter {
            lint_subqueries: config.lint_subqueries,
            max_query_length: config.max_query_length,
        }
    }

    pub fn lint(&self, select: &Select) -> LintResult<Vec<LintReport>> {
        let mut reports = Vec::new();
        self.lint_level(select, &Scope::new(), &mut reports)?;
        Ok(reports)
    }

    fn lint_level(
        &self,
        select: &Select,
        enclosing: &Scope,
        reports: &mut Vec<LintReport>,
    ) -> LintResult<()> {
        let graph = GraphBuilder::nested(enclosing.clone()).build(select);
        let connectivity = analyze(&graph, None)?;
        if !connectivity.is_connected() {
            let sql = Renderer::with_enclosing(enclosing.ids().clone()).select(select);
            if let Some(report) =
                LintReport::from_connectivity(summarize(&sql, self.max_query_length), &connectivity)
            {
                debug!("Disconnected FROM elements: {:?}", report.unmatched);
                reports.push(report);
            }
        }

        if self.lint_subqueries {
            for (nested, scope) in nested_selects(select, enclosing) {
                self.lint_level(&nested, &scope, reports)?;
            }
        }
        Ok(())
    }
}

impl Default for Linter {
    fn default() -> Self {
        Linter::new(&LinterConfig::default())
    }
}

/// Selects directly nested in `select`, each with the scope it sees.
fn nested_selects(select: &Select, enclosing: &Scope) -> Vec<(Select, Scope)> {
    let froms = select.froms_in(enclosing.ids());
    let leaves: Vec<SourceRef> = froms.iter().flat_map(|f| f.leaves()).collect();
    let level = enclosing.with(leaves.iter().cloned());

    let mut nested = Vec::new();
    for leaf in &leaves {
        if let Some(subquery) = leaf.as_subquery() {
            let scope = if subquery.is_lateral() {
                level.without(subquery.id())
            } else {
                Scope::new()
            };
            nested.push((subquery.select().clone(), scope));
        }
    }

    let mut collector = SubqueryCollector::default();
    for item in select.items() {
        if let SelectItem::Expr { expr, .. } = item {
            collector.visit_expr(expr);
        }
    }
    for from in &froms {
        collector.visit_join_conditions(from);
    }
    if let Some(where_clause) = select.where_clause() {
        collector.visit_expr(where_clause);
    }
    nested.extend(
        collector
            .found
            .into_iter()
            .map(|found| (found, level.clone())),
    );
    nested
}

#[derive(Default)]
struct SubqueryCollector {
    found: Vec<Select>,
}

impl SubqueryCollector {
    fn visit_join_conditions(&mut self, from: &FromSource) {
        if let FromSource::Join(join) = from {
            self.visit_join_conditions(join.left());
            self.visit_join_conditions(join.right());
            if let Some(on) = join.on() {
                self.visit_expr(on);
            }
        }
    }
}

impl ExprVisitor for SubqueryCollector {
    fn visit_subquery(&mut self, select: &Select) {
        self.found.push(select.clone());
    }
}
