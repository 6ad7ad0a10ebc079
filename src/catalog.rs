//! Declaration catalog: the input data model.
//!
//! A catalog is a fixed dataset describing the native API surface to bind:
//! declaration **groups** (one per native header), each owning a set of
//! named declarations, depending on other groups for type resolution, and
//! requiring native libraries at link time. The catalog is built once per
//! process through [`CatalogBuilder`], validated at build time, and
//! read-only afterwards, so it is safe to share across concurrent build
//! targets.
//!
//! # Example
//!
//! ```
//! use bindgraph::catalog::{CatalogBuilder, Declaration, DeclarationGroup, GroupId};
//!
//! let winuser = GroupId::new("um.winuser")?;
//! let catalog = CatalogBuilder::new()
//!     .group(
//!         DeclarationGroup::new(winuser)
//!             .with_declaration(Declaration::function("MessageBoxW"))
//!             .with_link("user32"),
//!     )
//!     .build()?;
//! assert_eq!(catalog.len(), 1);
//! # Ok::<(), bindgraph::Error>(())
//! ```
//!
//! # Enumeration encoding
//!
//! There is deliberately no `Enum` declaration kind. An enumeration is
//! encoded as one integer-typed [`DeclKind::TypeAlias`] for the logical
//! enumeration type plus independent [`DeclKind::Constant`]s of that alias.
//! This discards exhaustiveness and type-safety against out-of-range values,
//! and that is the point: it preserves bit-identical layout and the implicit
//! integer conversions native calling conventions expect. Do not "fix" this
//! with a closed sum type; it would break interoperability with native code
//! that freely combines and extends these values.

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a declaration group.
///
/// Hierarchical dot-separated path mirroring the native header layout,
/// e.g. `um.winuser` or `shared.ntdef`. Each segment is lowercase ASCII
/// matching `[a-z][a-z0-9_]*`. Ordered and hashable so group sets iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(String);

impl GroupId {
    /// Parse and validate a group identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the path is empty, has an empty segment,
    /// or contains a segment not matching `[a-z][a-z0-9_]*`.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(Error::invalid_input("group id cannot be empty"));
        }
        for segment in path.split('.') {
            if !is_valid_segment(segment) {
                return Err(Error::invalid_input(format!(
                    "invalid group id segment `{segment}` in `{path}`"
                )));
            }
        }
        Ok(Self(path))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The qualified path of a symbol owned by this group.
    #[must_use]
    pub fn qualify(&self, symbol: &str) -> String {
        format!("{}.{symbol}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// 128-bit interface identity value.
///
/// Laid out like the native `GUID` struct so emitted bindings can pass it
/// across the ABI boundary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Guid {
    /// First 32 bits.
    pub data1: u32,
    /// Next 16 bits.
    pub data2: u16,
    /// Next 16 bits.
    pub data3: u16,
    /// Final 64 bits.
    pub data4: [u8; 8],
}

impl Guid {
    /// Construct a GUID from its native field layout.
    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Parse a GUID from its canonical `8-4-4-4-12` hex form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the string is not in canonical form.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        let [p1, p2, p3, p4, p5] = parts.as_slice() else {
            return Err(Error::invalid_input(format!("malformed GUID `{s}`")));
        };
        if p1.len() != 8 || p2.len() != 4 || p3.len() != 4 || p4.len() != 4 || p5.len() != 12 {
            return Err(Error::invalid_input(format!("malformed GUID `{s}`")));
        }
        let bad = || Error::invalid_input(format!("malformed GUID `{s}`"));
        let data1 = u32::from_str_radix(p1, 16).map_err(|_| bad())?;
        let data2 = u16::from_str_radix(p2, 16).map_err(|_| bad())?;
        let data3 = u16::from_str_radix(p3, 16).map_err(|_| bad())?;
        let hi = u16::from_str_radix(p4, 16).map_err(|_| bad())?;
        let lo = u64::from_str_radix(p5, 16).map_err(|_| bad())?;
        let mut data4 = [0u8; 8];
        data4[0] = (hi >> 8) as u8;
        data4[1] = (hi & 0xff) as u8;
        for (i, byte) in data4[2..].iter_mut().enumerate() {
            *byte = (lo >> (40 - 8 * i)) as u8;
        }
        Ok(Self {
            data1,
            data2,
            data3,
            data4,
        })
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

bitflags! {
    /// Attributes carried by a declaration through to emission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclFlags: u8 {
        /// Deprecated in the native SDK; emitters may filter these out.
        const DEPRECATED = 1 << 0;
        /// ANSI (narrow-string) variant of a paired A/W declaration.
        const ANSI = 1 << 1;
        /// Wide-string variant of a paired A/W declaration.
        const WIDE = 1 << 2;
    }
}

/// Kind of a declaration.
///
/// See the module docs for why enumerations have no dedicated kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A named type alias (including enumeration logical types).
    TypeAlias,
    /// A named constant (including enumeration members).
    Constant,
    /// A native function signature.
    Function,
    /// A COM-style interface with a fixed identity and inheritance chain.
    Interface {
        /// Identity value used for dynamic interface queries.
        iid: Guid,
        /// Parent interfaces, nearest first. Conceptually single
        /// inheritance; modeled as an ordered list.
        parents: Vec<String>,
    },
}

/// A single named declaration owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Symbol name, unique within the owning group.
    pub name: String,
    /// What the symbol declares.
    pub kind: DeclKind,
    /// Emission attributes.
    pub flags: DeclFlags,
}

impl Declaration {
    /// Create a type-alias declaration.
    #[must_use]
    pub fn type_alias(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::TypeAlias,
            flags: DeclFlags::empty(),
        }
    }

    /// Create a constant declaration.
    #[must_use]
    pub fn constant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Constant,
            flags: DeclFlags::empty(),
        }
    }

    /// Create a function-signature declaration.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Function,
            flags: DeclFlags::empty(),
        }
    }

    /// Create an interface declaration with its identity value.
    ///
    /// Every interface carries a [`Guid`] structurally; there is no
    /// identity-less interface variant.
    #[must_use]
    pub fn interface(
        name: impl Into<String>,
        iid: Guid,
        parents: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Interface {
                iid,
                parents: parents.into_iter().collect(),
            },
            flags: DeclFlags::empty(),
        }
    }

    /// Set emission attributes.
    #[must_use]
    pub const fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check whether this is an interface-kind declaration.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, DeclKind::Interface { .. })
    }

    /// The interface identity value, if this is an interface.
    #[must_use]
    pub const fn interface_iid(&self) -> Option<Guid> {
        match &self.kind {
            DeclKind::Interface { iid, .. } => Some(*iid),
            _ => None,
        }
    }

    /// Parent interfaces, nearest first; empty for non-interfaces.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        match &self.kind {
            DeclKind::Interface { parents, .. } => parents,
            _ => &[],
        }
    }
}

/// A group of related declarations mirroring one native header.
///
/// Immutable once the owning [`Catalog`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationGroup {
    id: GroupId,
    declarations: Vec<Declaration>,
    dependencies: Vec<GroupId>,
    links: Vec<String>,
    reexports: Vec<String>,
}

impl DeclarationGroup {
    /// Create an empty group.
    #[must_use]
    pub const fn new(id: GroupId) -> Self {
        Self {
            id,
            declarations: Vec::new(),
            dependencies: Vec::new(),
            links: Vec::new(),
            reexports: Vec::new(),
        }
    }

    /// Add an owned declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Add a dependency on another group (type-level; cycles are valid).
    #[must_use]
    pub fn with_dependency(mut self, group: GroupId) -> Self {
        self.dependencies.push(group);
        self
    }

    /// Add a native library this group requires at link time.
    #[must_use]
    pub fn with_link(mut self, library: impl Into<String>) -> Self {
        self.links.push(library.into());
        self
    }

    /// Flatten a symbol from a direct dependency under this group's path.
    ///
    /// The symbol is not redefined; composition resolves it to exactly one
    /// source definition or fails.
    #[must_use]
    pub fn with_reexport(mut self, symbol: impl Into<String>) -> Self {
        self.reexports.push(symbol.into());
        self
    }

    /// The group identifier.
    #[must_use]
    pub const fn id(&self) -> &GroupId {
        &self.id
    }

    /// Owned declarations, in insertion order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Look up an owned declaration by symbol name.
    #[must_use]
    pub fn find(&self, symbol: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == symbol)
    }

    /// Groups this group depends on for type resolution.
    #[must_use]
    pub fn dependencies(&self) -> &[GroupId] {
        &self.dependencies
    }

    /// Native libraries required at link time.
    #[must_use]
    pub fn link_libraries(&self) -> &[String] {
        &self.links
    }

    /// Symbols flattened from direct dependencies.
    #[must_use]
    pub fn reexports(&self) -> &[String] {
        &self.reexports
    }
}

/// Builder for [`Catalog`].
///
/// Collects groups, then validates the whole dataset atomically in
/// [`build`](Self::build): either every integrity check passes or the load
/// fails with the first violation.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    groups: Vec<DeclarationGroup>,
}

impl CatalogBuilder {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Add a group.
    #[must_use]
    pub fn group(mut self, group: DeclarationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Validate and build the catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a duplicated group id or a malformed symbol name
    /// - `DuplicateDeclaration` when a group declares one symbol twice, or
    ///   both declares and re-exports it
    /// - `UnknownGroup` when a dependency references a group that is not in
    ///   the catalog
    pub fn build(self) -> Result<Catalog> {
        let mut groups = BTreeMap::new();
        for group in self.groups {
            validate_group(&group)?;
            let id = group.id.clone();
            if groups.insert(id.clone(), group).is_some() {
                return Err(Error::invalid_input(format!("duplicate group `{id}`")));
            }
        }
        for group in groups.values() {
            for dep in &group.dependencies {
                if !groups.contains_key(dep) {
                    return Err(Error::unknown_group(dep.clone()));
                }
            }
        }
        Ok(Catalog { groups })
    }
}

fn validate_group(group: &DeclarationGroup) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for decl in &group.declarations {
        if !is_valid_symbol(&decl.name) {
            return Err(Error::invalid_input(format!(
                "invalid symbol name `{}` in group {}",
                decl.name, group.id
            )));
        }
        if !seen.insert(decl.name.as_str()) {
            return Err(Error::duplicate_declaration(group.id.clone(), &decl.name));
        }
    }
    for symbol in &group.reexports {
        if !is_valid_symbol(symbol) {
            return Err(Error::invalid_input(format!(
                "invalid re-export symbol `{symbol}` in group {}",
                group.id
            )));
        }
        // A re-export spec colliding with an owned declaration, or repeated,
        // declares the symbol twice under this group's path.
        if !seen.insert(symbol.as_str()) {
            return Err(Error::duplicate_declaration(group.id.clone(), symbol));
        }
    }
    Ok(())
}

fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Immutable, validated set of declaration groups.
///
/// Built once per process, read-only afterwards; concurrent readers need no
/// synchronization.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: BTreeMap<GroupId, DeclarationGroup>,
}

impl Catalog {
    /// Look up a group by id.
    #[must_use]
    pub fn get(&self, id: &GroupId) -> Option<&DeclarationGroup> {
        self.groups.get(id)
    }

    /// Check whether a group exists.
    #[must_use]
    pub fn contains(&self, id: &GroupId) -> bool {
        self.groups.contains_key(id)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether the catalog has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in id order.
    pub fn groups(&self) -> impl Iterator<Item = &DeclarationGroup> {
        self.groups.values()
    }

    /// Iterate over group ids in order.
    pub fn group_ids(&self) -> impl Iterator<Item = &GroupId> + Clone {
        self.groups.keys()
    }

    /// Total number of owned declarations across all groups.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.groups.values().map(|g| g.declarations.len()).sum()
    }
}
