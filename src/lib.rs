//! Bindgraph: Feature-Gated Planning for Large FFI Binding Surfaces
//!
//! Bindgraph organizes thousands of native declarations (types, constants,
//! function signatures, COM-style interfaces) into dependency-aware
//! **groups**, one per native header, and computes, per build target,
//! exactly which groups to compile, which native libraries to link, and
//! which collision-free qualified path every declaration gets.
//!
//! # Pipeline
//!
//! | Stage | Module | Produces |
//! |-------|--------|----------|
//! | Catalog load | [`catalog`] | validated, immutable [`catalog::Catalog`] |
//! | Graph build | [`graph`] | dependency-adjacency [`graph::GroupGraph`] |
//! | Feature resolve | [`resolver`] | per-request [`resolver::ResolvedFeatureSet`] |
//! | Namespace compose | [`namespace`] | [`namespace::NamespaceAssignment`] |
//! | Emit | [`emit`] | [`emit::EmitPlan`] handed to an external emitter |
//!
//! The catalog and graph are built once per process and shared read-only;
//! every build target then resolves its own request independently.
//!
//! # Quick Start
//!
//! ```
//! use bindgraph::catalog::{CatalogBuilder, Declaration, DeclarationGroup, GroupId};
//! use bindgraph::resolver::FeatureRequest;
//!
//! let ntdef = GroupId::new("shared.ntdef")?;
//! let winuser = GroupId::new("um.winuser")?;
//! let catalog = CatalogBuilder::new()
//!     .group(
//!         DeclarationGroup::new(ntdef.clone())
//!             .with_declaration(Declaration::type_alias("HANDLE")),
//!     )
//!     .group(
//!         DeclarationGroup::new(winuser.clone())
//!             .with_declaration(Declaration::function("MessageBoxW"))
//!             .with_dependency(ntdef.clone())
//!             .with_link("user32"),
//!     )
//!     .build()?;
//!
//! // Requesting um.winuser pulls in shared.ntdef and links user32.
//! let (resolved, assignment) = bindgraph::plan(&catalog, &FeatureRequest::groups([winuser]))?;
//! assert!(resolved.contains(&ntdef));
//! assert_eq!(resolved.libraries(), ["user32"]);
//! assert!(assignment.resolve("um.winuser.MessageBoxW").is_some());
//! # Ok::<(), bindgraph::Error>(())
//! ```
//!
//! # Feature Gating
//!
//! Enabling a group transitively enables every group it depends on and
//! selects every library those groups require. The wildcard request
//! ([`resolver::FeatureRequest::all`]) compiles the entire surface; it is a
//! named, first-class option because it carries the longest build time, not
//! a default.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, Error>`]. Computation is
//! deterministic and data-driven: no error is retryable, and no partial
//! result is produced on failure.
//!
//! # Thread Safety
//!
//! [`catalog::Catalog`] and [`graph::GroupGraph`] are read-only after
//! construction and safe for concurrent readers; resolve independent build
//! targets on as many threads as you like without synchronization.

// This crate plans bindings; it never crosses the FFI boundary itself.
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod emit;
pub mod error;
pub mod graph;
pub mod namespace;
pub mod resolver;

// Re-export main types for convenience
pub use catalog::{
    Catalog, CatalogBuilder, DeclFlags, DeclKind, Declaration, DeclarationGroup, GroupId, Guid,
};
pub use emit::{BindingEmitter, CVoidPolicy, EmitOptions, EmitPlan, InterfaceId};
pub use error::{Error, Result, Stage};
pub use graph::GroupGraph;
pub use namespace::{DeclRef, NamespaceAssignment, NamespaceComposer, PathBinding};
pub use resolver::{FeatureRequest, FeatureResolver, ResolvedFeatureSet};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve a request and compose its namespace in one step.
///
/// Builds a fresh graph internally; callers driving many build targets
/// should instead build the [`GroupGraph`] once and use
/// [`FeatureResolver`] and [`NamespaceComposer`] directly.
///
/// # Errors
///
/// Returns `UnknownGroup` for a request naming a nonexistent group, or any
/// composition error (`AmbiguousReexport`, `UnresolvedReexport`).
pub fn plan(
    catalog: &Catalog,
    request: &FeatureRequest,
) -> Result<(ResolvedFeatureSet, NamespaceAssignment)> {
    tracing::debug!(stage = %Stage::GraphBuild, "planning build target");
    let graph = GroupGraph::build(catalog);
    tracing::debug!(stage = %Stage::FeatureResolve, "planning build target");
    let resolved = FeatureResolver::new(catalog, &graph).resolve(request)?;
    tracing::debug!(stage = %Stage::NamespaceCompose, "planning build target");
    let assignment = NamespaceComposer::new(catalog).compose(&resolved)?;
    Ok((resolved, assignment))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gid(s: &str) -> GroupId {
        GroupId::new(s).unwrap()
    }

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_plan_pipeline() {
        let catalog = CatalogBuilder::new()
            .group(
                DeclarationGroup::new(gid("shared.ntdef"))
                    .with_declaration(Declaration::type_alias("HANDLE")),
            )
            .group(
                DeclarationGroup::new(gid("um.winuser"))
                    .with_declaration(Declaration::function("MessageBoxW"))
                    .with_dependency(gid("shared.ntdef"))
                    .with_link("user32"),
            )
            .build()
            .unwrap();

        let (resolved, assignment) =
            plan(&catalog, &FeatureRequest::groups([gid("um.winuser")])).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(assignment.len(), 2);
    }

    #[test]
    fn test_plan_propagates_unknown_group() {
        let catalog = CatalogBuilder::new().build().unwrap();
        let err = plan(&catalog, &FeatureRequest::groups([gid("nope")])).unwrap_err();
        assert!(err.is_unknown_group());
    }

    #[test]
    fn test_error_reexport() {
        let err = Error::unknown_group(gid("um.winuser"));
        assert!(err.is_unknown_group());
    }

    #[test]
    fn test_guid_reexport() {
        let iid = Guid::new(1, 2, 3, [0; 8]);
        assert_eq!(iid.data1, 1);
    }

    #[test]
    fn test_request_reexport() {
        assert!(FeatureRequest::all().is_all());
    }
}
