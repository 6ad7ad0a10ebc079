//! Feature request resolution.
//!
//! Turns a [`FeatureRequest`] (the set of groups a consumer opted into)
//! into a [`ResolvedFeatureSet`]: the transitive closure of required groups
//! plus the native libraries the closure needs at link time. Enabling a
//! group always enables everything it depends on; a consumer can never
//! reference a declaration from a group outside the closure.
//!
//! Resolution is batch work: fresh per build target, deterministic, and
//! never retried. The catalog and graph are borrowed read-only, so
//! independent targets may resolve concurrently without synchronization.
//!
//! # Example
//!
//! ```
//! use bindgraph::catalog::{CatalogBuilder, DeclarationGroup, GroupId};
//! use bindgraph::graph::GroupGraph;
//! use bindgraph::resolver::{FeatureRequest, FeatureResolver};
//!
//! let ntdef = GroupId::new("shared.ntdef")?;
//! let winuser = GroupId::new("um.winuser")?;
//! let catalog = CatalogBuilder::new()
//!     .group(DeclarationGroup::new(ntdef.clone()))
//!     .group(
//!         DeclarationGroup::new(winuser.clone())
//!             .with_dependency(ntdef.clone())
//!             .with_link("user32"),
//!     )
//!     .build()?;
//! let graph = GroupGraph::build(&catalog);
//!
//! let resolved = FeatureResolver::new(&catalog, &graph)
//!     .resolve(&FeatureRequest::groups([winuser]))?;
//! assert!(resolved.contains(&ntdef));
//! assert_eq!(resolved.libraries(), ["user32"]);
//! # Ok::<(), bindgraph::Error>(())
//! ```

use crate::catalog::{Catalog, GroupId};
use crate::error::{Error, Result};
use crate::graph::GroupGraph;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, instrument, warn};

/// A consumer's request for binding groups.
///
/// Either an explicit set of group identifiers or the distinguished
/// wildcard built by [`FeatureRequest::all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRequest {
    groups: BTreeSet<GroupId>,
    all: bool,
}

impl FeatureRequest {
    /// Request an explicit set of groups (and, transitively, everything
    /// they depend on).
    #[must_use]
    pub fn groups(groups: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
            all: false,
        }
    }

    /// Request every group in the catalog.
    ///
    /// This is the maximal compiled surface and carries the longest build
    /// time of any request; it exists as a first-class, named option so the
    /// cost is an explicit opt-in, never a default.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            groups: BTreeSet::new(),
            all: true,
        }
    }

    /// Add one group to an explicit request.
    #[must_use]
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Check whether this is the wildcard request.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.all
    }

    /// The explicitly requested groups (empty for the wildcard).
    #[must_use]
    pub const fn requested(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }
}

/// The transitive closure of a request, plus the libraries it links.
///
/// Computed fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFeatureSet {
    groups: BTreeSet<GroupId>,
    libraries: Vec<String>,
}

impl ResolvedFeatureSet {
    /// Groups in the closure, in id order.
    #[must_use]
    pub const fn groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    /// Check whether a group is inside the closure.
    #[must_use]
    pub fn contains(&self, id: &GroupId) -> bool {
        self.groups.contains(id)
    }

    /// Native libraries to link: deduplicated, lexicographically sorted.
    ///
    /// Link order is insignificant for correctness; the sort exists for
    /// reproducible builds.
    #[must_use]
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Number of groups in the closure.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether the closure is empty (empty explicit request).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Computes feature closures against a fixed catalog and graph.
pub struct FeatureResolver<'a> {
    catalog: &'a Catalog,
    graph: &'a GroupGraph,
}

impl<'a> FeatureResolver<'a> {
    /// Create a resolver borrowing the process-wide catalog and graph.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, graph: &'a GroupGraph) -> Self {
        Self { catalog, graph }
    }

    /// Resolve a request into its transitive closure and library set.
    ///
    /// Breadth-first traversal over dependency edges with a visited set,
    /// so it terminates on cyclic graphs. Output is deterministic for a
    /// fixed catalog: groups in id order, libraries sorted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownGroup` if any explicitly requested group is not in
    /// the catalog. No other failure mode exists; the closure always
    /// terminates on a finite graph.
    #[instrument(level = "debug", skip(self, request))]
    pub fn resolve(&self, request: &FeatureRequest) -> Result<ResolvedFeatureSet> {
        let roots: Vec<GroupId> = if request.is_all() {
            debug!("wildcard request: enabling every group");
            self.catalog.group_ids().cloned().collect()
        } else {
            for id in request.requested() {
                if !self.graph.contains(id) {
                    warn!(group = %id, "request names a nonexistent group");
                    return Err(Error::unknown_group(id.clone()));
                }
            }
            request.requested().iter().cloned().collect()
        };

        let mut closure = BTreeSet::new();
        let mut visited: HashSet<GroupId> = HashSet::new();
        let mut queue: VecDeque<GroupId> = roots.into();
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(neighbors) = self.graph.neighbors(&id) {
                queue.extend(neighbors.iter().cloned());
            }
            closure.insert(id);
        }

        let mut libraries: BTreeSet<String> = BTreeSet::new();
        for id in &closure {
            if let Some(group) = self.catalog.get(id) {
                libraries.extend(group.link_libraries().iter().cloned());
            }
        }

        debug!(
            requested = request.requested().len(),
            closure = closure.len(),
            libraries = libraries.len(),
            "feature request resolved"
        );

        Ok(ResolvedFeatureSet {
            groups: closure,
            libraries: libraries.into_iter().collect(),
        })
    }
}
