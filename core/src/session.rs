//! Match session — one matching attempt's bookkeeping
//!
//! A session lives for exactly one top-level match. It records every
//! placeholder it binds and the single binding set it is allowed to write
//! into. On success the bindings stay; on any failure (or a panic inside a
//! guard) they are cleared again. The binding set's session guard is released
//! on every exit path when the session is dropped.

use crate::{
    BindingSet, Error, Guard, MatchError, Placeholder, Result, Schema, SchemaError, Value,
};
use parking_lot::MutexGuard;
use tracing::{debug, trace};

pub(crate) struct Session<'s> {
    /// Binding set adopted on first bind, with its held session guard.
    active: Option<(&'s BindingSet, MutexGuard<'s, ()>)>,
    /// Undo log: every placeholder bound by this attempt, in order.
    bound: Vec<&'s Placeholder>,
    committed: bool,
}

impl<'s> Session<'s> {
    fn new() -> Self {
        Self {
            active: None,
            bound: Vec::new(),
            committed: false,
        }
    }

    /// Run one complete match: validate, match, check guards, then commit or unwind.
    pub(crate) fn run(schema: &'s Schema, data: &Value, guards: &[&dyn Guard]) -> Result<Value> {
        schema.validate()?;

        let mut session = Session::new();
        let matched = session
            .match_schema(schema, data)
            .and_then(|matched| session.check_guards(guards).map(|()| matched));

        match matched {
            Ok(value) => {
                session.committed = true;
                Ok(value)
            }
            Err(e) => {
                debug!(names = session.bound.len(), error = %e, "match failed, unwinding bindings");
                session.rollback();
                Err(e)
            }
        }
    }

    /// Bind `value` under the placeholder's name.
    ///
    /// The first bind adopts the placeholder's binding set and blocks until its
    /// session guard is free.
    pub(crate) fn bind(&mut self, placeholder: &'s Placeholder, value: &Value) -> Result<Value> {
        let set = placeholder.binding_set();
        match self.active.as_ref().map(|(active, _)| active.ptr_eq(set)) {
            None => self.active = Some((set, set.lock_session())),
            Some(false) => return Err(SchemaError::MultipleBindingSets.into()),
            Some(true) => {}
        }

        set.bind(placeholder.name(), value.clone())?;
        self.bound.push(placeholder);
        trace!(name = placeholder.name(), "bound");
        Ok(value.clone())
    }

    fn check_guards(&self, guards: &[&dyn Guard]) -> Result<()> {
        for (index, guard) in guards.iter().enumerate() {
            if !guard.check().map_err(Error::Guard)? {
                return Err(MatchError::GuardRejected { index }.into());
            }
        }
        Ok(())
    }

    fn rollback(&mut self) {
        for placeholder in self.bound.drain(..) {
            placeholder.binding_set().clear(placeholder.name());
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
        // The session guard in `active` is released after this body runs.
    }
}
