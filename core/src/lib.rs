//! destructure - Structural pattern matching with transactional name binding
//!
//! Matches a data value against a schema describing its expected shape, and
//! binds parts of the data to names while doing so.
//!
//! # Architecture
//!
//! - [`Value`] — Data side: scalars, sequences, maps, and [`Structured`] objects
//! - [`Schema`] — Expected shape: one variant per kind of shape
//! - [`BindingSet`] — Named capture target; unbound names read as [`Placeholder`]s
//! - [`match_data`] — Recursive walk of schema and data in lockstep
//! - [`Switch`] — Tries several schemas against one datum
//!
//! # Key Design Insights
//!
//! 1. **A match is a transaction**: every binding made by a failed match is
//!    unwound before the error is returned. Successful matches keep theirs.
//!
//! 2. **One binding set per schema**: a schema whose placeholders come from
//!    two binding sets is rejected before any data is read.
//!
//! 3. **Sessions serialize per binding set**: a match holds its binding set's
//!    session guard from its first bind until it ends, so concurrent matches
//!    into one set never interleave their writes.
//!
//! # Example
//!
//! ```
//! use destructure::prelude::*;
//!
//! let o = BindingSet::new();
//! let schema: Schema = Schema::map()
//!     .entry("id", Type::Int)
//!     .entry("tags", Schema::list([o.var("first"), Schema::Any]))
//!     .rest(o.var("extra"))
//!     .into();
//!
//! let data = Value::map([
//!     ("id", 1.into()),
//!     ("tags", Value::list(["a".into(), "b".into(), "c".into()])),
//!     ("note", "hi".into()),
//! ]);
//!
//! match_data(&schema, &data)?;
//! assert_eq!(o.value("first"), Some(Value::from("a")));
//! assert_eq!(o.value("extra"), Some(Value::from("hi")));
//! # Ok::<(), destructure::Error>(())
//! ```
//!
//! # Features
//!
//! - `serde` — `Serialize`/`Deserialize` for [`Value`]
//! - `json` — conversions from `serde_json` (implies `serde`)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod binding;
mod error;
mod guard;
mod matcher;
mod schema;
mod session;
mod switch;
mod value;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "serde")]
mod serde_impl;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use binding::{BindingSet, Placeholder, Slot};
pub use schema::{MapPattern, ObjectPattern, Schema, SeqPattern, Type};
pub use switch::Switch;
pub use value::{SeqKind, Structured, TypeTag, Value};

// Matching
pub use guard::{Fallible, Guard};
pub use matcher::{match_data, match_with_guards};

// Errors
pub use error::{BindError, Error, GuardError, MatchError, Result, SchemaError};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use destructure::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Matching
        match_data,
        match_with_guards,
        // Core types
        BindingSet,
        // Errors
        Error,
        Fallible,
        Guard,
        MapPattern,
        MatchError,
        ObjectPattern,
        Schema,
        SeqKind,
        Slot,
        Structured,
        Switch,
        Type,
        TypeTag,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth of a schema.
///
/// The matcher recurses once per nesting level, so the limit bounds stack use
/// on small thread stacks (test threads default to 2 MiB). Schemas are written
/// by hand and mirror documents, which rarely nest beyond a dozen levels.
/// Checked before every match by [`Schema::validate`]; a deeper schema fails
/// with [`SchemaError::DepthExceeded`].
pub const MAX_DEPTH: usize = 64;

/// Object fields whose names start with this prefix are private and never matched.
pub const PRIVATE_PREFIX: &str = "_";
