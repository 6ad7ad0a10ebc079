//! Integration tests for bindgraph.
//!
//! These tests verify the public API works correctly as a cohesive unit,
//! driving the full pipeline over a miniature but realistic catalog shaped
//! like a user-mode SDK surface: shared header groups, user-mode groups,
//! and a convenience umbrella that flattens common types.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bindgraph::catalog::{
    Catalog, CatalogBuilder, DeclFlags, Declaration, DeclarationGroup, GroupId, Guid,
};
use bindgraph::emit::{BindingEmitter, CVoidPolicy, EmitOptions, EmitPlan};
use bindgraph::error::Error;
use bindgraph::graph::GroupGraph;
use bindgraph::namespace::NamespaceComposer;
use bindgraph::resolver::{FeatureRequest, FeatureResolver};
use bindgraph::{plan, Result, VERSION};
use tracing_test::traced_test;

fn gid(s: &str) -> GroupId {
    GroupId::new(s).unwrap()
}

/// A miniature user-mode SDK catalog:
///
/// - `shared.guiddef`: GUID plumbing, no dependencies
/// - `shared.ntdef`: base handle/status types
/// - `um.winuser`: windowing, depends on both shared groups, links user32
/// - `um.gdi`: drawing, depends on shared.ntdef, links gdi32
/// - `um.unknwn`: IUnknown, depends on shared.guiddef, links ole32
/// - `um`: convenience umbrella flattening HANDLE and GUID
fn sdk_catalog() -> Catalog {
    let iunknown_iid = Guid::parse("00000000-0000-0000-c000-000000000046").unwrap();
    CatalogBuilder::new()
        .group(
            DeclarationGroup::new(gid("shared.guiddef"))
                .with_declaration(Declaration::type_alias("GUID"))
                .with_declaration(Declaration::type_alias("REFIID")),
        )
        .group(
            DeclarationGroup::new(gid("shared.ntdef"))
                .with_declaration(Declaration::type_alias("HANDLE"))
                .with_declaration(Declaration::type_alias("NTSTATUS"))
                .with_declaration(Declaration::constant("STATUS_SUCCESS")),
        )
        .group(
            DeclarationGroup::new(gid("um.winuser"))
                .with_declaration(Declaration::function("MessageBoxW").with_flags(DeclFlags::WIDE))
                .with_declaration(Declaration::function("MessageBoxA").with_flags(DeclFlags::ANSI))
                .with_declaration(Declaration::constant("WM_PAINT"))
                .with_declaration(
                    Declaration::function("WinHelpW")
                        .with_flags(DeclFlags::WIDE | DeclFlags::DEPRECATED),
                )
                .with_dependency(gid("shared.ntdef"))
                .with_dependency(gid("shared.guiddef"))
                .with_link("user32"),
        )
        .group(
            DeclarationGroup::new(gid("um.gdi"))
                .with_declaration(Declaration::function("GetDC"))
                .with_declaration(Declaration::type_alias("HDC"))
                .with_dependency(gid("shared.ntdef"))
                .with_link("gdi32"),
        )
        .group(
            DeclarationGroup::new(gid("um.unknwn"))
                .with_declaration(Declaration::interface("IUnknown", iunknown_iid, Vec::new()))
                .with_dependency(gid("shared.guiddef"))
                .with_link("ole32"),
        )
        .group(
            DeclarationGroup::new(gid("um"))
                .with_dependency(gid("shared.ntdef"))
                .with_dependency(gid("shared.guiddef"))
                .with_reexport("HANDLE")
                .with_reexport("GUID"),
        )
        .build()
        .unwrap()
}

// =============================================================================
// Library-level tests
// =============================================================================

#[test]
fn test_version_semver_format() {
    let parts: Vec<&str> = VERSION.split('.').collect();
    assert!(parts.len() >= 2, "Version should have at least major.minor");
    for part in &parts {
        assert!(
            part.parse::<u32>().is_ok(),
            "Version parts should be numeric"
        );
    }
}

#[test]
fn test_plan_convenience_matches_manual_pipeline() {
    let catalog = sdk_catalog();
    let request = FeatureRequest::groups([gid("um.winuser")]);

    let (resolved, assignment) = plan(&catalog, &request).unwrap();

    let graph = GroupGraph::build(&catalog);
    let manual_resolved = FeatureResolver::new(&catalog, &graph)
        .resolve(&request)
        .unwrap();
    let manual_assignment = NamespaceComposer::new(&catalog)
        .compose(&manual_resolved)
        .unwrap();

    assert_eq!(resolved, manual_resolved);
    assert_eq!(assignment, manual_assignment);
}

// =============================================================================
// Feature resolution
// =============================================================================

#[test]
fn test_requesting_winuser_pulls_shared_groups() {
    let catalog = sdk_catalog();
    let (resolved, _) = plan(&catalog, &FeatureRequest::groups([gid("um.winuser")])).unwrap();

    assert!(resolved.contains(&gid("um.winuser")));
    assert!(resolved.contains(&gid("shared.ntdef")));
    assert!(resolved.contains(&gid("shared.guiddef")));
    assert!(!resolved.contains(&gid("um.gdi")));
    assert!(!resolved.contains(&gid("um.unknwn")));
    assert_eq!(resolved.libraries(), ["user32"]);
}

#[test]
fn test_two_requests_union_their_surfaces() {
    let catalog = sdk_catalog();
    let (resolved, _) = plan(
        &catalog,
        &FeatureRequest::groups([gid("um.winuser"), gid("um.gdi")]),
    )
    .unwrap();

    assert!(resolved.contains(&gid("um.gdi")));
    assert_eq!(resolved.libraries(), ["gdi32", "user32"]);
}

#[test]
fn test_wildcard_is_the_maximal_surface() {
    let catalog = sdk_catalog();
    let (resolved, assignment) = plan(&catalog, &FeatureRequest::all()).unwrap();

    assert_eq!(resolved.len(), catalog.len());
    assert_eq!(resolved.libraries(), ["gdi32", "ole32", "user32"]);
    // Owned declarations plus the two flattened aliases.
    assert_eq!(assignment.len(), catalog.declaration_count() + 2);
}

#[test]
fn test_unknown_group_request_fails_atomically() {
    let catalog = sdk_catalog();
    let err = plan(
        &catalog,
        &FeatureRequest::groups([gid("um.winuser"), gid("um.missing")]),
    )
    .unwrap_err();

    assert!(err.is_unknown_group());
    assert_eq!(err.group().map(GroupId::as_str), Some("um.missing"));
}

#[traced_test]
#[test]
fn test_resolution_emits_debug_logging() {
    let catalog = sdk_catalog();
    let graph = GroupGraph::build(&catalog);
    let _ = FeatureResolver::new(&catalog, &graph)
        .resolve(&FeatureRequest::groups([gid("um.winuser")]))
        .unwrap();

    assert!(logs_contain("feature request resolved"));
}

// =============================================================================
// Namespace composition
// =============================================================================

#[test]
fn test_umbrella_flattens_shared_types() {
    let catalog = sdk_catalog();
    let (_, assignment) = plan(&catalog, &FeatureRequest::groups([gid("um")])).unwrap();

    let handle = assignment.resolve("um.HANDLE").unwrap();
    assert_eq!(handle.group, gid("shared.ntdef"));
    let guid = assignment.resolve("um.GUID").unwrap();
    assert_eq!(guid.group, gid("shared.guiddef"));

    // The definitions themselves remain addressable.
    assert!(assignment.resolve("shared.ntdef.HANDLE").is_some());
    assert_eq!(assignment.is_reexport("um.HANDLE"), Some(true));
}

#[test]
fn test_interface_identity_is_preserved_end_to_end() {
    let catalog = sdk_catalog();
    let (resolved, _) = plan(&catalog, &FeatureRequest::groups([gid("um.unknwn")])).unwrap();

    let group = catalog.get(&gid("um.unknwn")).unwrap();
    let decl = group.find("IUnknown").unwrap();
    assert!(decl.is_interface());
    assert_eq!(
        decl.interface_iid().unwrap().to_string(),
        "00000000-0000-0000-c000-000000000046"
    );
    assert!(resolved.contains(&gid("shared.guiddef")));
}

#[test]
fn test_conflicting_umbrella_is_rejected() {
    // Two shared groups define HANDLE differently; the umbrella flattens it.
    let catalog = CatalogBuilder::new()
        .group(
            DeclarationGroup::new(gid("shared.a"))
                .with_declaration(Declaration::type_alias("HANDLE")),
        )
        .group(
            DeclarationGroup::new(gid("shared.b"))
                .with_declaration(Declaration::constant("HANDLE")),
        )
        .group(
            DeclarationGroup::new(gid("um"))
                .with_dependency(gid("shared.a"))
                .with_dependency(gid("shared.b"))
                .with_reexport("HANDLE"),
        )
        .build()
        .unwrap();

    let err = plan(&catalog, &FeatureRequest::groups([gid("um")])).unwrap_err();
    match err {
        Error::AmbiguousReexport { first, second, .. } => {
            assert_eq!(first, gid("shared.a"));
            assert_eq!(second, gid("shared.b"));
        }
        other => panic!("expected AmbiguousReexport, got {other:?}"),
    }
}

// =============================================================================
// Emission contract
// =============================================================================

struct CountingEmitter {
    emitted: Vec<String>,
}

impl BindingEmitter for CountingEmitter {
    fn emit(&mut self, plan: &EmitPlan<'_>) -> Result<()> {
        for (group, decl) in plan.declarations() {
            self.emitted.push(group.qualify(&decl.name));
        }
        Ok(())
    }
}

#[test]
fn test_emitter_never_sees_unrequested_groups() {
    let catalog = sdk_catalog();
    let (resolved, assignment) =
        plan(&catalog, &FeatureRequest::groups([gid("um.winuser")])).unwrap();
    let emit_plan = EmitPlan::new(&catalog, &resolved, &assignment, EmitOptions::new());

    let mut emitter = CountingEmitter {
        emitted: Vec::new(),
    };
    emitter.emit(&emit_plan).unwrap();

    assert!(emitter
        .emitted
        .contains(&"um.winuser.MessageBoxW".to_owned()));
    assert!(emitter.emitted.contains(&"shared.ntdef.HANDLE".to_owned()));
    assert!(!emitter.emitted.iter().any(|p| p.starts_with("um.gdi")));
    assert!(!emitter.emitted.iter().any(|p| p.starts_with("um.unknwn")));
}

#[test]
fn test_deprecated_declarations_are_opt_in() {
    let catalog = sdk_catalog();
    let (resolved, assignment) =
        plan(&catalog, &FeatureRequest::groups([gid("um.winuser")])).unwrap();

    let default_plan = EmitPlan::new(&catalog, &resolved, &assignment, EmitOptions::new());
    assert!(!default_plan
        .declarations()
        .any(|(_, d)| d.name == "WinHelpW"));

    let with_deprecated = EmitPlan::new(
        &catalog,
        &resolved,
        &assignment,
        EmitOptions::new().with_deprecated(),
    );
    assert!(with_deprecated
        .declarations()
        .any(|(_, d)| d.name == "WinHelpW"));
}

#[test]
fn test_void_policy_defaults_to_private() {
    let options = EmitOptions::new();
    assert_eq!(options.c_void, CVoidPolicy::Private);

    let interop = EmitOptions::new().with_c_void(CVoidPolicy::Interop);
    assert_eq!(interop.c_void, CVoidPolicy::Interop);
}

// =============================================================================
// Determinism across invocations
// =============================================================================

#[test]
fn test_repeated_plans_are_identical() {
    let catalog = sdk_catalog();
    let request = FeatureRequest::groups([gid("um.winuser"), gid("um.unknwn")]);

    let first = plan(&catalog, &request).unwrap();
    for _ in 0..10 {
        assert_eq!(plan(&catalog, &request).unwrap(), first);
    }
}

#[test]
fn test_independent_requests_share_catalog_concurrently() {
    let catalog = sdk_catalog();
    let graph = GroupGraph::build(&catalog);

    std::thread::scope(|scope| {
        for target in ["um.winuser", "um.gdi", "um.unknwn", "um"] {
            let catalog = &catalog;
            let graph = &graph;
            scope.spawn(move || {
                let resolver = FeatureResolver::new(catalog, graph);
                let resolved = resolver
                    .resolve(&FeatureRequest::groups([gid(target)]))
                    .unwrap();
                let assignment = NamespaceComposer::new(catalog).compose(&resolved).unwrap();
                assert!(!assignment.is_empty() || resolved.is_empty());
            });
        }
    });
}
