//! Namespace composition.
//!
//! Assigns every declaration in scope a unique qualified path. The base
//! rule is `<group-path>.<symbol>`: group paths are unique and symbol names
//! are unique within a group (and symbols never contain `.`), so paths are
//! collision-free by construction. A bare symbol may legitimately appear in
//! many groups; the path disambiguates.
//!
//! The exception is **flattening**: a convenience group (the user-mode
//! umbrella pattern) may re-export selected symbols from its direct
//! dependencies under its own prefix without redefining them. Each
//! flattened symbol must resolve to exactly one definition; conflicting
//! definitions across dependencies fail closed with `AmbiguousReexport`
//! rather than guessing a precedence order.

use crate::catalog::{Catalog, Declaration, GroupId};
use crate::error::{Error, Result};
use crate::resolver::ResolvedFeatureSet;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Reference to a defining declaration: owning group plus symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeclRef {
    /// The group that owns the definition.
    pub group: GroupId,
    /// The symbol name within that group.
    pub symbol: String,
}

impl DeclRef {
    /// Create a reference.
    #[must_use]
    pub fn new(group: GroupId, symbol: impl Into<String>) -> Self {
        Self {
            group,
            symbol: symbol.into(),
        }
    }
}

/// One qualified path bound to its defining declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
    /// The fully qualified path, e.g. `um.winuser.MessageBoxW`.
    pub path: String,
    /// The declaration the path resolves to.
    pub target: DeclRef,
    /// Whether the path is a flattened alias rather than the definition
    /// site itself.
    pub reexported: bool,
}

/// Mapping from qualified paths to defining declarations.
///
/// Invariant: no two distinct declarations share a path. Computed fresh per
/// composition and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceAssignment {
    bindings: BTreeMap<String, PathBinding>,
}

impl NamespaceAssignment {
    /// Resolve a qualified path to its defining declaration.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&DeclRef> {
        self.bindings.get(path).map(|b| &b.target)
    }

    /// The qualified path assigned to a group's owned symbol, if in scope.
    #[must_use]
    pub fn path_of(&self, group: &GroupId, symbol: &str) -> Option<&str> {
        let path = group.qualify(symbol);
        self.bindings
            .get(&path)
            .filter(|b| !b.reexported)
            .map(|b| b.path.as_str())
    }

    /// Check whether a path is a flattened alias.
    #[must_use]
    pub fn is_reexport(&self, path: &str) -> Option<bool> {
        self.bindings.get(path).map(|b| b.reexported)
    }

    /// Iterate over bindings in path order.
    pub fn iter(&self) -> impl Iterator<Item = &PathBinding> {
        self.bindings.values()
    }

    /// Number of assigned paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether the assignment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Composes namespace assignments against a fixed catalog.
pub struct NamespaceComposer<'a> {
    catalog: &'a Catalog,
}

impl<'a> NamespaceComposer<'a> {
    /// Create a composer borrowing the process-wide catalog.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Compose an assignment for the groups inside a resolved closure.
    ///
    /// # Errors
    ///
    /// - `AmbiguousReexport` when two direct dependencies define a
    ///   flattened symbol differently (both sources named)
    /// - `UnresolvedReexport` when no direct dependency defines a
    ///   flattened symbol
    #[instrument(level = "debug", skip_all)]
    pub fn compose(&self, resolved: &ResolvedFeatureSet) -> Result<NamespaceAssignment> {
        self.compose_scope(resolved.groups().iter())
    }

    /// Compose an assignment over the entire catalog.
    ///
    /// Used for whole-catalog validation independent of any request.
    ///
    /// # Errors
    ///
    /// Same as [`compose`](Self::compose).
    #[instrument(level = "debug", skip_all)]
    pub fn compose_full(&self) -> Result<NamespaceAssignment> {
        self.compose_scope(self.catalog.group_ids())
    }

    fn compose_scope<'s>(
        &self,
        scope: impl Iterator<Item = &'s GroupId> + Clone,
    ) -> Result<NamespaceAssignment> {
        let mut bindings = BTreeMap::new();

        for id in scope.clone() {
            let Some(group) = self.catalog.get(id) else {
                continue;
            };
            for decl in group.declarations() {
                let path = id.qualify(&decl.name);
                bindings.insert(
                    path.clone(),
                    PathBinding {
                        path,
                        target: DeclRef::new(id.clone(), &decl.name),
                        reexported: false,
                    },
                );
            }
        }

        for id in scope {
            let Some(group) = self.catalog.get(id) else {
                continue;
            };
            for symbol in group.reexports() {
                let source = self.resolve_reexport(id, symbol)?;
                let path = id.qualify(symbol);
                bindings.insert(
                    path.clone(),
                    PathBinding {
                        path,
                        target: source,
                        reexported: true,
                    },
                );
            }
        }

        debug!(paths = bindings.len(), "namespace composed");
        Ok(NamespaceAssignment { bindings })
    }

    /// Find the single eligible definition of a flattened symbol among the
    /// convenience group's direct dependencies.
    fn resolve_reexport(&self, convenience: &GroupId, symbol: &str) -> Result<DeclRef> {
        let Some(group) = self.catalog.get(convenience) else {
            return Err(Error::unknown_group(convenience.clone()));
        };

        let mut sources: Vec<(&GroupId, &Declaration)> = Vec::new();
        for dep in group.dependencies() {
            if let Some(decl) = self.catalog.get(dep).and_then(|g| g.find(symbol)) {
                sources.push((dep, decl));
            }
        }
        // Deterministic winner selection among identical definitions.
        sources.sort_by_key(|(dep, _)| *dep);
        sources.dedup_by_key(|(dep, _)| *dep);

        let Some((first_group, first_decl)) = sources.first().copied() else {
            return Err(Error::unresolved_reexport(convenience.clone(), symbol));
        };
        for (other_group, other_decl) in &sources[1..] {
            if *other_decl != first_decl {
                return Err(Error::ambiguous_reexport(
                    convenience.clone(),
                    symbol,
                    first_group.clone(),
                    (*other_group).clone(),
                ));
            }
        }
        Ok(DeclRef::new(first_group.clone(), symbol))
    }
}
