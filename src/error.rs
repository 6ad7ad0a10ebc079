//! Error types for bindgraph.
//!
//! All errors implement `std::error::Error` and provide human-readable
//! messages. Error variants are specific enough to allow programmatic
//! handling: a build driver can distinguish a bad request (`UnknownGroup`)
//! from a corrupt catalog (`DuplicateDeclaration`) without string matching.
//!
//! All computation here is deterministic and data-driven, so no error is
//! retryable: the same input always fails the same way.

use crate::catalog::GroupId;
use std::fmt;
use thiserror::Error;

/// Primary error type for bindgraph operations.
///
/// Each variant provides sufficient context for debugging while remaining
/// actionable for programmatic error handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A request or catalog entry referenced a group that does not exist.
    ///
    /// Fatal for the request that raised it; the catalog itself is
    /// unaffected.
    #[error("unknown group: {group}")]
    UnknownGroup {
        /// The group identifier that could not be found.
        group: GroupId,
    },

    /// A group declares the same symbol twice.
    ///
    /// Catalog integrity violation, raised at load time. A group that both
    /// defines and re-exports a symbol also lands here, since it effectively
    /// declares the symbol twice under its own path.
    #[error("duplicate declaration `{symbol}` in group {group}")]
    DuplicateDeclaration {
        /// The group containing the duplicate.
        group: GroupId,
        /// The symbol declared more than once.
        symbol: String,
    },

    /// A convenience group would flatten conflicting definitions of one
    /// symbol from two dependency groups.
    ///
    /// Raised at composition time; names both conflicting sources so the
    /// catalog author can split or rename.
    #[error("ambiguous re-export of `{symbol}` into {group}: {first} and {second} define it differently")]
    AmbiguousReexport {
        /// The convenience group performing the flattening.
        group: GroupId,
        /// The conflicting symbol.
        symbol: String,
        /// First conflicting source group.
        first: GroupId,
        /// Second conflicting source group.
        second: GroupId,
    },

    /// A re-export spec names a symbol that no direct dependency defines.
    ///
    /// Emitting a dangling alias or silently dropping the spec would
    /// produce a partial result, so this fails the composition instead.
    #[error("unresolved re-export of `{symbol}` in {group}: no direct dependency defines it")]
    UnresolvedReexport {
        /// The convenience group with the dangling spec.
        group: GroupId,
        /// The symbol that could not be resolved.
        symbol: String,
    },

    /// A value-level dependency cycle that cannot be resolved by forward
    /// declaration.
    ///
    /// Type-level cycles (mutually-referential pointer types) are valid and
    /// tolerated throughout this crate; this variant is reserved for a
    /// future extension that distinguishes value-level cycles and is never
    /// constructed by the current pipeline.
    #[error("unresolvable dependency cycle: {path}")]
    CycleDetected {
        /// Human-readable cycle path, e.g. `a -> b -> a`.
        path: String,
    },

    /// Invalid input was provided to an API.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was invalid.
        reason: String,
    },
}

/// Result type alias for bindgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new `UnknownGroup` error.
    #[must_use]
    pub const fn unknown_group(group: GroupId) -> Self {
        Self::UnknownGroup { group }
    }

    /// Create a new `DuplicateDeclaration` error.
    #[must_use]
    pub fn duplicate_declaration(group: GroupId, symbol: impl Into<String>) -> Self {
        Self::DuplicateDeclaration {
            group,
            symbol: symbol.into(),
        }
    }

    /// Create a new `AmbiguousReexport` error.
    #[must_use]
    pub fn ambiguous_reexport(
        group: GroupId,
        symbol: impl Into<String>,
        first: GroupId,
        second: GroupId,
    ) -> Self {
        Self::AmbiguousReexport {
            group,
            symbol: symbol.into(),
            first,
            second,
        }
    }

    /// Create a new `UnresolvedReexport` error.
    #[must_use]
    pub fn unresolved_reexport(group: GroupId, symbol: impl Into<String>) -> Self {
        Self::UnresolvedReexport {
            group,
            symbol: symbol.into(),
        }
    }

    /// Create a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Check if this error indicates a nonexistent group.
    #[must_use]
    pub const fn is_unknown_group(&self) -> bool {
        matches!(self, Self::UnknownGroup { .. })
    }

    /// Check if this error is a catalog integrity violation.
    #[must_use]
    pub const fn is_duplicate_declaration(&self) -> bool {
        matches!(self, Self::DuplicateDeclaration { .. })
    }

    /// Check if this error is a re-export conflict.
    #[must_use]
    pub const fn is_ambiguous_reexport(&self) -> bool {
        matches!(self, Self::AmbiguousReexport { .. })
    }

    /// Get the group this error concerns, if any.
    #[must_use]
    pub const fn group(&self) -> Option<&GroupId> {
        match self {
            Self::UnknownGroup { group }
            | Self::DuplicateDeclaration { group, .. }
            | Self::AmbiguousReexport { group, .. }
            | Self::UnresolvedReexport { group, .. } => Some(group),
            Self::CycleDetected { .. } | Self::InvalidInput { .. } => None,
        }
    }
}

/// Pipeline stages that can report errors.
///
/// Used by build drivers to attribute a failure to the stage that raised it
/// when logging or rendering diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Catalog loading and integrity validation.
    CatalogLoad,
    /// Group dependency graph construction.
    GraphBuild,
    /// Feature request closure resolution.
    FeatureResolve,
    /// Namespace composition.
    NamespaceCompose,
    /// Declaration emission.
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogLoad => write!(f, "catalog load"),
            Self::GraphBuild => write!(f, "graph build"),
            Self::FeatureResolve => write!(f, "feature resolve"),
            Self::NamespaceCompose => write!(f, "namespace compose"),
            Self::Emit => write!(f, "emit"),
        }
    }
}
