//! Error taxonomy.
//!
//! - [`MatchError`] — data does not conform to the schema (recoverable, drives alternation)
//! - [`SchemaError`] — the schema itself breaks the engine's rules (programming defect)
//! - [`BindError`] — a name already holds a value (stale binding set or a lost race)
//!
//! [`Error`] wraps all three plus errors raised by fallible guards.

use crate::Value;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised by a guard that could not be evaluated.
pub type GuardError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Data did not match the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Data is not an instance of the referenced type.
    #[error("{data:?} does not match type {expected:?}")]
    TypeMismatch {
        /// Name of the expected type.
        expected: String,
        /// The offending data.
        data: Value,
    },

    /// Data is not equal to a literal.
    #[error("{data:?} did not match literal {expected:?}")]
    LiteralMismatch {
        /// The literal from the schema.
        expected: Value,
        /// The offending data.
        data: Value,
    },

    /// A map schema met non-map data.
    #[error("expected a map, got {found:?}")]
    ExpectedMap {
        /// Kind of the data found instead.
        found: &'static str,
    },

    /// Keys required by the schema are absent from the data.
    #[error("missing {n} keys {keys:?}", n = .keys.len())]
    MissingKeys {
        /// The absent keys.
        keys: Vec<String>,
    },

    /// The data carries keys the schema does not declare.
    #[error("got {n} unexpected keys {keys:?}", n = .keys.len())]
    UnexpectedKeys {
        /// The undeclared keys.
        keys: Vec<String>,
    },

    /// A rest entry was declared but the data has no extra items.
    #[error("rest entry {rest} specified, but no extra items found")]
    NoExtraItems {
        /// Rendering of the rest entry's schema.
        rest: String,
    },

    /// A non-wildcard rest entry met more than one extra item.
    #[error("rest entry {rest} cannot match {n} extra items {keys:?}", n = .keys.len())]
    TooManyExtraItems {
        /// Rendering of the rest entry's schema.
        rest: String,
        /// The extra keys.
        keys: Vec<String>,
    },

    /// A sequence schema met non-sequence data.
    #[error("expected a sequence, got {found:?}")]
    ExpectedSequence {
        /// Kind of the data found instead.
        found: &'static str,
    },

    /// An empty sequence schema met non-empty data.
    #[error("expected empty sequence, got {data:?}")]
    ExpectedEmpty {
        /// The offending data.
        data: Value,
    },

    /// The schema is longer than the data.
    #[error("missing values {missing}")]
    MissingValues {
        /// Rendering of the unmatched schema tail.
        missing: String,
    },

    /// The data is longer than the schema.
    #[error("got unexpected values {values:?}")]
    UnexpectedValues {
        /// The unmatched data tail.
        values: Vec<Value>,
    },

    /// An object pattern met data of a different concrete type.
    #[error("expected an instance of {expected:?}, got {found:?}")]
    ObjectTypeMismatch {
        /// Name of the pattern's type.
        expected: &'static str,
        /// Kind of the data found instead.
        found: &'static str,
    },

    /// A data object lacks an attribute the pattern names.
    #[error("{type_name} object is missing attribute {name:?}")]
    MissingAttribute {
        /// Type of the data object.
        type_name: &'static str,
        /// The missing attribute.
        name: String,
    },

    /// The structure matched but a guard returned `false`.
    #[error("guard {index} rejected the match")]
    GuardRejected {
        /// Position of the rejecting guard.
        index: usize,
    },
}

/// The schema is malformed for this engine.
///
/// Never treated as an alternation outcome: a `Switch` propagates these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Placeholders from two different binding sets appear in one schema.
    #[error("schema may only use one binding set")]
    MultipleBindingSets,

    /// A sequence schema contains more than one variable-length gap.
    #[error("sequence schema may contain at most one wildcard, found {count}")]
    MultipleWildcards {
        /// Number of wildcards found.
        count: usize,
    },

    /// Schema nesting is deeper than the matcher allows.
    #[error("schema nesting exceeds maximum depth {max}")]
    DepthExceeded {
        /// Maximum allowed depth.
        max: usize,
    },
}

/// A name could not be bound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The name already holds a concrete value.
    #[error("name {name:?} has already been bound to {bound:?}, cannot bind {attempted:?}")]
    AlreadyBound {
        /// The name.
        name: String,
        /// Value currently bound.
        bound: Value,
        /// Value that was refused.
        attempted: Value,
    },
}

/// Any failure of a match attempt.
#[derive(Debug, Error)]
pub enum Error {
    /// Data did not match.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// The schema is malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A name could not be bound.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// A guard failed with its own error.
    #[error("guard failed: {0}")]
    Guard(#[source] GuardError),
}

impl Error {
    /// Returns `true` for data mismatches, the only failure a `Switch` recovers from.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// The mismatch, if this is one.
    #[must_use]
    pub fn as_mismatch(&self) -> Option<&MatchError> {
        match self {
            Self::Match(e) => Some(e),
            _ => None,
        }
    }
}
