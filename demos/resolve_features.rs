//! Feature Resolution Example
//!
//! Builds a miniature SDK catalog, resolves a feature request, and reports
//! the transitive closure, link libraries, and namespace assignment.
//!
//! Run with: cargo run --example `resolve_features`

use bindgraph::catalog::{CatalogBuilder, Declaration, DeclarationGroup, GroupId};
use bindgraph::resolver::FeatureRequest;

fn main() -> bindgraph::Result<()> {
    let ntdef = GroupId::new("shared.ntdef")?;
    let guiddef = GroupId::new("shared.guiddef")?;
    let winuser = GroupId::new("um.winuser")?;
    let gdi = GroupId::new("um.gdi")?;
    let um = GroupId::new("um")?;

    let catalog = CatalogBuilder::new()
        .group(
            DeclarationGroup::new(ntdef.clone())
                .with_declaration(Declaration::type_alias("HANDLE"))
                .with_declaration(Declaration::type_alias("NTSTATUS")),
        )
        .group(
            DeclarationGroup::new(guiddef.clone())
                .with_declaration(Declaration::type_alias("GUID")),
        )
        .group(
            DeclarationGroup::new(winuser.clone())
                .with_declaration(Declaration::function("MessageBoxW"))
                .with_declaration(Declaration::constant("WM_PAINT"))
                .with_dependency(ntdef.clone())
                .with_dependency(guiddef.clone())
                .with_link("user32"),
        )
        .group(
            DeclarationGroup::new(gdi)
                .with_declaration(Declaration::function("GetDC"))
                .with_dependency(ntdef.clone())
                .with_link("gdi32"),
        )
        .group(
            DeclarationGroup::new(um)
                .with_dependency(ntdef)
                .with_dependency(guiddef)
                .with_reexport("HANDLE")
                .with_reexport("GUID"),
        )
        .build()?;

    println!("bindgraph {}: catalog with {} groups, {} declarations",
        bindgraph::VERSION,
        catalog.len(),
        catalog.declaration_count(),
    );
    println!();

    let request = FeatureRequest::groups([winuser]);
    let (resolved, assignment) = bindgraph::plan(&catalog, &request)?;

    println!("Requested: um.winuser");
    println!("Closure ({} groups):", resolved.len());
    for group in resolved.groups() {
        println!("  {group}");
    }
    println!("Link libraries: {}", resolved.libraries().join(", "));
    println!();

    println!("Namespace assignment ({} paths):", assignment.len());
    for binding in assignment.iter() {
        let marker = if binding.reexported { " (re-export)" } else { "" };
        println!("  {}{marker}", binding.path);
    }
    println!();

    // The wildcard is the maximal surface, an explicit opt-in.
    let (everything, _) = bindgraph::plan(&catalog, &FeatureRequest::all())?;
    println!(
        "Wildcard request: {} groups, libraries: {}",
        everything.len(),
        everything.libraries().join(", "),
    );

    Ok(())
}
