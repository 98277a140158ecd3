//! The FROM graph: an arena of FROM elements plus undirected "touch" edges.
//!
//! Elements are addressed by [`ElementId`], their index in the arena, which is
//! also their canonical order. The mapping from query sources to ids lives only
//! as long as the graph, i.e. one analysis call.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::query::{SourceId, SourceRef};

use super::predicate::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// A FROM element of the query being analysed.
    Local,
    /// A source of an enclosing query, referenced through correlation. It
    /// links local elements together but is never reported itself.
    Correlated,
}

#[derive(Debug, Clone)]
pub struct FromElement {
    id: ElementId,
    source: SourceRef,
    role: ElementRole,
}

impl FromElement {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    pub fn is_local(&self) -> bool {
        self.role == ElementRole::Local
    }
}

#[derive(Debug, Clone, Default)]
pub struct FromGraph {
    elements: Vec<FromElement>,
    index: HashMap<SourceId, ElementId>,
    adjacency: Vec<BTreeSet<ElementId>>,
    predicates: Vec<Predicate>,
}

impl FromGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, returning its id. Registering the same source twice
    /// returns the existing id and keeps its first role.
    pub fn add_element(&mut self, source: SourceRef, role: ElementRole) -> ElementId {
        if let Some(id) = self.index.get(&source.id()) {
            return *id;
        }
        let id = ElementId(self.elements.len());
        self.index.insert(source.id(), id);
        self.elements.push(FromElement { id, source, role });
        self.adjacency.push(BTreeSet::new());
        id
    }

    /// Add an undirected edge. Self-loops and unknown ids are ignored.
    pub fn add_edge(&mut self, a: ElementId, b: ElementId) {
        if a == b || a.0 >= self.elements.len() || b.0 >= self.elements.len() {
            return;
        }
        self.adjacency[a.0].insert(b);
        self.adjacency[b.0].insert(a);
    }

    /// Connect every pair of the given elements.
    pub fn connect_all(&mut self, ids: &BTreeSet<ElementId>) {
        let ids: Vec<ElementId> = ids.iter().copied().collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                self.add_edge(*a, *b);
            }
        }
    }

    pub(crate) fn push_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn element(&self, id: ElementId) -> Option<&FromElement> {
        self.elements.get(id.0)
    }

    pub fn lookup(&self, source: &SourceRef) -> Option<ElementId> {
        self.lookup_id(source.id())
    }

    pub fn lookup_id(&self, id: SourceId) -> Option<ElementId> {
        self.index.get(&id).copied()
    }

    /// All elements in canonical order, correlated ones included.
    pub fn elements(&self) -> &[FromElement] {
        &self.elements
    }

    pub fn local_elements(&self) -> impl Iterator<Item = &FromElement> {
        self.elements.iter().filter(|e| e.is_local())
    }

    /// True when the graph has no local elements.
    pub fn is_empty(&self) -> bool {
        self.local_elements().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn neighbors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.adjacency
            .get(id.0)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn has_edge(&self, a: ElementId, b: ElementId) -> bool {
        self.adjacency
            .get(a.0)
            .map(|set| set.contains(&b))
            .unwrap_or(false)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|set| set.len()).sum::<usize>() / 2
    }

    /// Predicates the graph was built from, including those that touched fewer
    /// than two elements and so produced no edge.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}
