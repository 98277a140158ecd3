//! Reachability over the FROM graph.

use std::collections::VecDeque;

use log::debug;

use crate::query::SourceRef;

use super::errors::LintError;
use super::graph::{ElementId, FromElement, FromGraph};

/// Result of a connectivity check from one starting element.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectivity {
    start: Option<SourceRef>,
    unmatched: Vec<SourceRef>,
}

impl Connectivity {
    /// The element traversal started from; `None` only for a query without
    /// FROM elements analysed without an explicit start.
    pub fn start(&self) -> Option<&SourceRef> {
        self.start.as_ref()
    }

    /// Local elements not reachable from the start, in canonical order.
    pub fn unmatched(&self) -> &[SourceRef] {
        &self.unmatched
    }

    pub fn is_connected(&self) -> bool {
        self.unmatched.is_empty()
    }

    pub fn into_parts(self) -> (Vec<SourceRef>, Option<SourceRef>) {
        (self.unmatched, self.start)
    }
}

/// Find the local elements of `graph` that are not connected to `start`.
///
/// Without a start the first local element in canonical order is used. A
/// graph without local elements yields an empty result and returns `start`
/// unchanged. A start that is not a local element of a non-empty graph is a
/// caller error.
pub fn analyze(graph: &FromGraph, start: Option<&SourceRef>) -> Result<Connectivity, LintError> {
    if graph.is_empty() {
        return Ok(Connectivity {
            start: start.cloned(),
            unmatched: Vec::new(),
        });
    }

    let start_id = match start {
        Some(source) => graph
            .lookup(source)
            .filter(|id| graph.element(*id).map(FromElement::is_local).unwrap_or(false))
            .ok_or_else(|| LintError::StartNotInFroms(source.name().to_string()))?,
        None => match graph.local_elements().next() {
            Some(element) => element.id(),
            None => {
                return Ok(Connectivity {
                    start: None,
                    unmatched: Vec::new(),
                })
            }
        },
    };

    let reachable = reachable_from(graph, start_id);
    let unmatched: Vec<SourceRef> = graph
        .local_elements()
        .filter(|element| !reachable[element.id().index()])
        .map(|element| element.source().clone())
        .collect();

    let start_source = graph
        .element(start_id)
        .map(|element| element.source().clone());
    debug!(
        "Connectivity from '{}': {} unmatched element(s)",
        start_source.as_ref().map(|s| s.name()).unwrap_or_default(),
        unmatched.len()
    );

    Ok(Connectivity {
        start: start_source,
        unmatched,
    })
}

/// Breadth-first reachability; the returned vector is indexed by element id.
pub fn reachable_from(graph: &FromGraph, start: ElementId) -> Vec<bool> {
    let mut visited = vec![false; graph.len()];
    if start.index() >= graph.len() {
        return visited;
    }

    let mut queue = VecDeque::from([start]);
    visited[start.index()] = true;
    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    visited
}

/// Partition the local elements into connected components.
///
/// Components are ordered by their first element, and elements within a
/// component keep canonical order. Correlated elements link components but are
/// not listed.
pub fn components(graph: &FromGraph) -> Vec<Vec<SourceRef>> {
    let mut assigned = vec![false; graph.len()];
    let mut result = Vec::new();

    for element in graph.local_elements() {
        if assigned[element.id().index()] {
            continue;
        }
        let reachable = reachable_from(graph, element.id());
        let component: Vec<SourceRef> = graph
            .local_elements()
            .filter(|other| reachable[other.id().index()])
            .map(|other| other.source().clone())
            .collect();
        for (index, reached) in reachable.iter().enumerate() {
            if *reached {
                assigned[index] = true;
            }
        }
        result.push(component);
    }
    result
}
