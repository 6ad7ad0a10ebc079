//! Stub Emitter Example
//!
//! Implements the `BindingEmitter` collaborator trait with a stub that
//! prints what a real code generator would receive, demonstrating that the
//! plan hands over only closure-resident declarations.
//!
//! Run with: cargo run --example `emit_stub`

use bindgraph::catalog::{CatalogBuilder, DeclFlags, Declaration, DeclarationGroup, GroupId, Guid};
use bindgraph::emit::{BindingEmitter, CVoidPolicy, EmitOptions, EmitPlan};
use bindgraph::resolver::FeatureRequest;

struct PrintEmitter;

impl BindingEmitter for PrintEmitter {
    fn emit(&mut self, plan: &EmitPlan<'_>) -> bindgraph::Result<()> {
        println!("emitting {} declarations", plan.declaration_count());
        println!("void policy: {:?}", plan.options().c_void);
        println!("link: {}", plan.link_libraries().join(", "));
        for (group, decl) in plan.declarations() {
            let iid = decl
                .interface_iid()
                .map(|iid| format!("  [iid {iid}]"))
                .unwrap_or_default();
            println!("  {}  ({:?}){iid}", group.qualify(&decl.name), decl.kind);
        }
        Ok(())
    }
}

fn main() -> bindgraph::Result<()> {
    let guiddef = GroupId::new("shared.guiddef")?;
    let unknwn = GroupId::new("um.unknwn")?;

    let catalog = CatalogBuilder::new()
        .group(
            DeclarationGroup::new(guiddef.clone())
                .with_declaration(Declaration::type_alias("GUID")),
        )
        .group(
            DeclarationGroup::new(unknwn.clone())
                .with_declaration(Declaration::interface(
                    "IUnknown",
                    Guid::parse("00000000-0000-0000-c000-000000000046")?,
                    Vec::new(),
                ))
                .with_declaration(
                    Declaration::function("CoTaskMemAlloc").with_flags(DeclFlags::DEPRECATED),
                )
                .with_dependency(guiddef)
                .with_link("ole32"),
        )
        .build()?;

    let (resolved, assignment) = bindgraph::plan(&catalog, &FeatureRequest::groups([unknwn]))?;
    let options = EmitOptions::new().with_c_void(CVoidPolicy::Interop);
    let plan = EmitPlan::new(&catalog, &resolved, &assignment, options);

    PrintEmitter.emit(&plan)?;
    Ok(())
}
