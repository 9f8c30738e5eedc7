//! `BindingSet` — Named capture target for a match
//!
//! A binding set maps names to values. Reading a name that holds no value
//! yields a [`Placeholder`], which can be dropped anywhere a schema value is
//! expected; a successful match then binds the captured data under that name.
//!
//! # Concurrency
//!
//! A binding set carries two locks:
//!
//! - the **slot lock**, held only for the duration of a single read or write
//! - the **session guard**, held by a match session from its first bind into
//!   this set until the session ends, so only one in-flight match writes into
//!   the set at a time
//!
//! Two sessions racing to bind the same name are serialized by the session
//! guard; the loser sees the name already bound and fails with a [`BindError`].

use crate::{BindError, Schema, Value};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named capture target.
///
/// Cloning a `BindingSet` yields another handle to the same set.
///
/// # Example
///
/// ```
/// use destructure::{match_data, BindingSet, Schema, Value};
///
/// let o = BindingSet::new();
/// let schema = Schema::list([1.into(), 2.into(), o.var("x")]);
/// let data = Value::list([1.into(), 2.into(), 3.into()]);
///
/// assert_eq!(match_data(&schema, &data).unwrap(), data);
/// assert_eq!(o.value("x"), Some(Value::from(3)));
/// ```
#[derive(Clone, Default)]
pub struct BindingSet {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    slots: Mutex<BTreeMap<String, Value>>,
    session: Mutex<()>,
}

impl BindingSet {
    /// Create an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-bind a name (builder pattern).
    ///
    /// A pre-bound name behaves exactly like one bound by a match: reading it
    /// yields the value, and binding it again fails until it is cleared.
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.slots.lock().insert(name.into(), value.into());
        self
    }

    /// Read a name: its value if bound, a fresh placeholder otherwise.
    #[must_use]
    pub fn get(&self, name: &str) -> Slot {
        match self.value(name) {
            Some(value) => Slot::Bound(value),
            None => Slot::Unbound(self.placeholder(name)),
        }
    }

    /// Schema position for `name`: a capture while unbound, a literal once bound.
    ///
    /// Equivalent to `Schema::from(self.get(name))`.
    #[must_use]
    pub fn var(&self, name: &str) -> Schema {
        Schema::from(self.get(name))
    }

    /// Placeholder for `name`, regardless of whether it is bound.
    #[must_use]
    pub fn placeholder(&self, name: impl Into<String>) -> Placeholder {
        Placeholder {
            set: self.clone(),
            name: name.into(),
        }
    }

    /// Value bound to `name`, if any.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Value> {
        self.inner.slots.lock().get(name).cloned()
    }

    /// Returns `true` if `name` holds a value.
    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.inner.slots.lock().contains_key(name)
    }

    /// Bind `value` to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::AlreadyBound`] if `name` already holds a value.
    /// Clear it first to rebind.
    pub fn bind(&self, name: impl Into<String>, value: Value) -> Result<(), BindError> {
        let name = name.into();
        let mut slots = self.inner.slots.lock();
        if let Some(bound) = slots.get(&name) {
            return Err(BindError::AlreadyBound {
                name,
                bound: bound.clone(),
                attempted: value,
            });
        }
        slots.insert(name, value);
        Ok(())
    }

    /// Return `name` to unbound, yielding the value it held.
    pub fn clear(&self, name: &str) -> Option<Value> {
        self.inner.slots.lock().remove(name)
    }

    /// Return every name to unbound.
    pub fn clear_all(&self) {
        self.inner.slots.lock().clear();
    }

    /// Names currently bound, in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner.slots.lock().keys().cloned().collect()
    }

    /// Copy of every binding.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.slots.lock().clone()
    }

    /// Returns `true` if both handles refer to the same set.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Acquire the session guard. Blocks while another session holds it.
    pub(crate) fn lock_session(&self) -> MutexGuard<'_, ()> {
        self.inner.session.lock()
    }

    #[cfg(test)]
    pub(crate) fn session_locked(&self) -> bool {
        self.inner.session.is_locked()
    }
}

impl fmt::Debug for BindingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

/// Marker for a name that holds no value yet.
///
/// Identifies a `(BindingSet, name)` pair. Used as a schema value, it matches
/// any data and binds it under `name`.
#[derive(Clone)]
pub struct Placeholder {
    set: BindingSet,
    name: String,
}

impl Placeholder {
    /// The binding set this placeholder binds into.
    #[must_use]
    pub fn binding_set(&self) -> &BindingSet {
        &self.set
    }

    /// The name this placeholder binds.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Placeholder {
    fn eq(&self, other: &Self) -> bool {
        self.set.ptr_eq(&other.set) && self.name == other.name
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<unbound {}>", self.name)
    }
}

/// Result of reading a name from a [`BindingSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// The name holds a value.
    Bound(Value),
    /// The name holds nothing yet.
    Unbound(Placeholder),
}

impl Slot {
    /// Returns `true` for `Unbound`.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unbound(_))
    }

    /// The bound value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Bound(v) => Some(v),
            Self::Unbound(_) => None,
        }
    }
}
