//! Emission contract.
//!
//! The binding emitter, the tool that turns resolved declarations into
//! compilable artifacts, is an external collaborator. This module defines
//! everything it is handed: an [`EmitPlan`] bundling the resolved closure,
//! the namespace assignment, and emission options.
//!
//! The plan is also the enforcement point of the feature-gate policy: its
//! iterator yields declarations **only** for groups inside the resolved
//! set, so a consumer can never reference a declaration from a group it did
//! not request directly or transitively.

use crate::catalog::{Catalog, Declaration, DeclFlags, GroupId, Guid};
use crate::error::Result;
use crate::namespace::NamespaceAssignment;
use crate::resolver::ResolvedFeatureSet;

/// Identity capability of every emitted interface type.
///
/// Emitters must implement this for each interface-kind declaration they
/// produce, with no variant exempt; the associated constant makes the
/// requirement structural rather than a runtime convention, and dispatch
/// stays static.
pub trait InterfaceId {
    /// The interface's identity value.
    const IID: Guid;

    /// Retrieve the identity value.
    #[must_use]
    fn iid(&self) -> Guid {
        Self::IID
    }
}

/// How the C-void-equivalent placeholder type is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CVoidPolicy {
    /// A private, deliberately incompatible definition.
    ///
    /// The default: keeps the emitted bindings free of any dependency on a
    /// standard runtime.
    #[default]
    Private,
    /// Alias the embedding environment's standard void-pointer-compatible
    /// type.
    ///
    /// Required only when the emitted bindings must interoperate with other
    /// FFI-producing code in the same program.
    Interop,
}

/// Options controlling emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitOptions {
    /// C-void placeholder policy.
    pub c_void: CVoidPolicy,
    /// Whether declarations flagged [`DeclFlags::DEPRECATED`] are emitted.
    pub include_deprecated: bool,
}

impl EmitOptions {
    /// Create the default options: private void type, deprecated filtered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the C-void placeholder policy.
    #[must_use]
    pub const fn with_c_void(mut self, policy: CVoidPolicy) -> Self {
        self.c_void = policy;
        self
    }

    /// Include declarations flagged deprecated.
    #[must_use]
    pub const fn with_deprecated(mut self) -> Self {
        self.include_deprecated = true;
        self
    }
}

/// Everything an emitter needs for one build target.
///
/// Borrows the process-wide catalog plus the per-target resolution results;
/// discarded after emission.
pub struct EmitPlan<'a> {
    catalog: &'a Catalog,
    resolved: &'a ResolvedFeatureSet,
    assignment: &'a NamespaceAssignment,
    options: EmitOptions,
}

impl<'a> EmitPlan<'a> {
    /// Assemble a plan.
    #[must_use]
    pub const fn new(
        catalog: &'a Catalog,
        resolved: &'a ResolvedFeatureSet,
        assignment: &'a NamespaceAssignment,
        options: EmitOptions,
    ) -> Self {
        Self {
            catalog,
            resolved,
            assignment,
            options,
        }
    }

    /// The resolved closure this plan covers.
    #[must_use]
    pub const fn resolved(&self) -> &ResolvedFeatureSet {
        self.resolved
    }

    /// The namespace assignment for the closure.
    #[must_use]
    pub const fn assignment(&self) -> &NamespaceAssignment {
        self.assignment
    }

    /// Emission options.
    #[must_use]
    pub const fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Native libraries the emitted artifact must link against.
    #[must_use]
    pub fn link_libraries(&self) -> &[String] {
        self.resolved.libraries()
    }

    /// Declarations to emit, in group-id then insertion order.
    ///
    /// Yields only declarations owned by groups inside the resolved
    /// closure, with deprecated declarations filtered unless the options
    /// include them. Nothing outside the closure ever reaches the emitter.
    pub fn declarations(&self) -> impl Iterator<Item = (&GroupId, &Declaration)> {
        let include_deprecated = self.options.include_deprecated;
        self.resolved
            .groups()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .flat_map(move |group| {
                group
                    .declarations()
                    .iter()
                    .filter(move |decl| {
                        include_deprecated || !decl.flags.contains(DeclFlags::DEPRECATED)
                    })
                    .map(move |decl| (group.id(), decl))
            })
    }

    /// Number of declarations the plan will emit.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.declarations().count()
    }
}

impl std::fmt::Debug for EmitPlan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitPlan")
            .field("groups", &self.resolved.len())
            .field("paths", &self.assignment.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// External collaborator that turns a plan into compilable artifacts.
///
/// Out of scope for this crate beyond the seam itself; test suites and
/// demos provide stub implementations.
pub trait BindingEmitter {
    /// Emit every declaration in the plan.
    ///
    /// # Errors
    ///
    /// Implementation-defined; a failed emission must not leave partial
    /// artifacts behind.
    fn emit(&mut self, plan: &EmitPlan<'_>) -> Result<()>;
}
