//! Builds the FROM graph of one query level.
//!
//! 1. Every top-level FROM entry is flattened into its leaf sources, which
//!    become the local elements in declaration order.
//! 2. Each join step with an ON condition yields a predicate touching both
//!    operands' leaves plus any other element the condition references.
//! 3. Each lateral subquery yields a correlation predicate touching itself and
//!    the outer elements referenced from inside it.
//! 4. The WHERE clause is split into top-level conjuncts, each one predicate.
//!
//! Predicates touching two or more elements connect all of them pairwise.

use std::collections::BTreeSet;

use log::debug;

use crate::query::{FromSource, Select, SourceId, SourceRef};

use super::graph::{ElementId, ElementRole, FromGraph};
use super::predicate::{
    correlated_refs, split_conjuncts, touched_sources, Predicate, PredicateOrigin, Scope,
};

pub struct GraphBuilder {
    enclosing: Scope,
}

impl GraphBuilder {
    /// Builder for a standalone (top-level) select.
    pub fn new() -> Self {
        GraphBuilder {
            enclosing: Scope::new(),
        }
    }

    /// Builder for a select nested inside queries whose sources are `enclosing`.
    pub(crate) fn nested(enclosing: Scope) -> Self {
        GraphBuilder { enclosing }
    }

    pub fn build(&self, select: &Select) -> FromGraph {
        let mut graph = FromGraph::new();
        let froms = select.froms_in(self.enclosing.ids());

        let leaves: Vec<SourceRef> = froms.iter().flat_map(|f| f.leaves()).collect();
        for leaf in &leaves {
            graph.add_element(leaf.clone(), ElementRole::Local);
        }
        for source in self.enclosing.sources() {
            graph.add_element(source.clone(), ElementRole::Correlated);
        }

        let scope = self.enclosing.with(leaves.iter().cloned());
        let mut touches: Vec<(PredicateOrigin, BTreeSet<SourceId>)> = Vec::new();

        for from in &froms {
            collect_join_touches(from, &scope, &mut touches);
        }

        for leaf in &leaves {
            if let Some(subquery) = leaf.as_subquery().filter(|s| s.is_lateral()) {
                let mut touched = correlated_refs(subquery.select(), &scope.without(subquery.id()));
                touched.insert(subquery.id());
                touches.push((PredicateOrigin::Correlation, touched));
            }
        }

        if let Some(where_clause) = select.where_clause() {
            for conjunct in split_conjuncts(where_clause) {
                touches.push((PredicateOrigin::Where, touched_sources(conjunct, &scope)));
            }
        }

        for (origin, sources) in touches {
            let elements: BTreeSet<ElementId> = sources
                .into_iter()
                .filter_map(|id| graph.lookup_id(id))
                .collect();
            let predicate = Predicate::new(origin, elements);
            if predicate.is_edge() {
                graph.connect_all(predicate.elements());
            }
            graph.push_predicate(predicate);
        }

        debug!(
            "FROM graph: {} element(s) ({} local), {} edge(s) from {} predicate(s)",
            graph.len(),
            graph.local_elements().count(),
            graph.edge_count(),
            graph.predicates().len()
        );
        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the graph of a standalone select.
pub fn build_graph(select: &Select) -> FromGraph {
    GraphBuilder::new().build(select)
}

fn collect_join_touches(
    from: &FromSource,
    scope: &Scope,
    touches: &mut Vec<(PredicateOrigin, BTreeSet<SourceId>)>,
) {
    let FromSource::Join(join) = from else {
        return;
    };
    collect_join_touches(join.left(), scope, touches);
    collect_join_touches(join.right(), scope, touches);

    // Cross joins carry no condition and join nothing.
    if let Some(on) = join.on() {
        let mut touched = touched_sources(on, scope);
        touched.extend(join.left().leaves().iter().map(|s| s.id()));
        touched.extend(join.right().leaves().iter().map(|s| s.id()));
        touches.push((PredicateOrigin::JoinCondition, touched));
    }
}
