//! Group dependency graph.
//!
//! A pure transformation of the catalog into an adjacency structure: an
//! edge `A -> B` means group A's declarations reference a type defined in
//! group B. Neighbor lookup is O(1) by group id; neighbor lists are sorted
//! and deduplicated so every traversal over the graph is deterministic.
//!
//! Dependency cycles are valid here. Group dependencies are type-level, and
//! mutually-referential pointer types across headers are routine; the
//! consumer resolves them with forward declarations. [`GroupGraph::is_cyclic`]
//! is informational only and never gates anything.

use crate::catalog::{Catalog, GroupId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Directed dependency graph over declaration groups.
///
/// Built once from a [`Catalog`] and read-only afterwards; safe to share
/// across concurrent build targets.
#[derive(Debug, Clone)]
pub struct GroupGraph {
    adjacency: HashMap<GroupId, Vec<GroupId>>,
}

impl GroupGraph {
    /// Build the graph from a validated catalog.
    ///
    /// Pure: the catalog already guarantees every dependency target exists,
    /// so construction cannot fail.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let mut adjacency = HashMap::with_capacity(catalog.len());
        for group in catalog.groups() {
            let mut neighbors: Vec<GroupId> = group.dependencies().to_vec();
            neighbors.sort_unstable();
            neighbors.dedup();
            adjacency.insert(group.id().clone(), neighbors);
        }
        debug!(groups = adjacency.len(), "group graph built");
        Self { adjacency }
    }

    /// Dependency targets of a group, sorted; `None` if the group is absent.
    #[must_use]
    pub fn neighbors(&self, id: &GroupId) -> Option<&[GroupId]> {
        self.adjacency.get(id).map(Vec::as_slice)
    }

    /// Check whether a group is present.
    #[must_use]
    pub fn contains(&self, id: &GroupId) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Number of groups in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Check whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Total number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Check whether the graph contains any dependency cycle.
    ///
    /// Informational only: type-level cycles are tolerated by the whole
    /// pipeline. Useful for catalog diagnostics and reporting.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        let mut visited = HashSet::new();
        let mut in_stack = HashSet::new();
        for start in self.adjacency.keys() {
            if !visited.contains(start) && self.has_cycle_from(start, &mut visited, &mut in_stack) {
                return true;
            }
        }
        false
    }

    fn has_cycle_from<'a>(
        &'a self,
        node: &'a GroupId,
        visited: &mut HashSet<&'a GroupId>,
        in_stack: &mut HashSet<&'a GroupId>,
    ) -> bool {
        visited.insert(node);
        in_stack.insert(node);
        if let Some(neighbors) = self.neighbors(node) {
            for next in neighbors {
                if in_stack.contains(next) {
                    return true;
                }
                if !visited.contains(next) && self.has_cycle_from(next, visited, in_stack) {
                    return true;
                }
            }
        }
        in_stack.remove(node);
        false
    }
}
