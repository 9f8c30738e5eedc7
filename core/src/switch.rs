//! `Switch` — Try several schemas against one datum
//!
//! A switch holds a single datum and a binding set. Each case matches the
//! datum against one schema; a case that does not match clears the binding
//! set so the next case starts from a clean slate.

use crate::{match_with_guards, BindingSet, Guard, Result, Schema, Value};
use tracing::debug;

/// Case dispatch over a single datum.
///
/// # Example
///
/// ```
/// use destructure::{BindingSet, MapPattern, Switch, Type, Value};
///
/// let o = BindingSet::new();
/// let data = Value::map([("id", 7.into()), ("name", "seven".into())]);
/// let switch = Switch::new(data, o.clone());
///
/// if switch.case(&MapPattern::new().entry("error", o.var("e")).into())? {
///     unreachable!();
/// } else if switch.case(&MapPattern::new().entry("id", Type::Int).entry("name", o.var("name")).into())? {
///     assert_eq!(o.value("name"), Some(Value::from("seven")));
/// }
/// # Ok::<(), destructure::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Switch {
    data: Value,
    bindings: BindingSet,
}

impl Switch {
    /// Create a switch over `data`, binding into `bindings`.
    #[must_use]
    pub fn new(data: impl Into<Value>, bindings: BindingSet) -> Self {
        Self {
            data: data.into(),
            bindings,
        }
    }

    /// The datum every case is matched against.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The binding set cleared after a failed case.
    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Match the datum against `schema`.
    ///
    /// Returns `Ok(true)` on a match. On a data mismatch the binding set is
    /// cleared (pre-bound names included) and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Schema, bind and guard errors are not mismatches and propagate.
    pub fn case(&self, schema: &Schema) -> Result<bool> {
        self.case_with(schema, &[])
    }

    /// Like [`case`](Self::case), with guards evaluated after the structure matched.
    ///
    /// A guard returning `false` counts as a mismatch.
    ///
    /// # Errors
    ///
    /// See [`case`](Self::case).
    pub fn case_with(&self, schema: &Schema, guards: &[&dyn Guard]) -> Result<bool> {
        match match_with_guards(schema, &self.data, guards) {
            Ok(_) => Ok(true),
            Err(e) if e.is_mismatch() => {
                debug!(error = %e, "case did not match");
                self.bindings.clear_all();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Try `schemas` in order and return the index of the first that matches.
    ///
    /// # Errors
    ///
    /// The first non-mismatch error from any case tried.
    pub fn select(&self, schemas: &[Schema]) -> Result<Option<usize>> {
        for (index, schema) in schemas.iter().enumerate() {
            if self.case(schema)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}
