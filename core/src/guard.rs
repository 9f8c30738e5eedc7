//! Guards — post-match predicates
//!
//! A guard runs after the structure has matched and may read the binding set
//! the match just populated. A guard returning `false` turns the match into a
//! [`MatchError::GuardRejected`](crate::MatchError::GuardRejected); a guard
//! returning an error aborts the match with [`Error::Guard`](crate::Error::Guard).

use crate::GuardError;

/// Post-match predicate.
///
/// Implemented for every `Fn() -> bool`. Wrap a closure returning
/// `Result<bool, E>` in [`Fallible`] to let it fail with its own error.
///
/// # Example
///
/// ```
/// use destructure::{match_with_guards, BindingSet, Guard, Value};
///
/// let o = BindingSet::new();
/// let positive = || o.value("n").and_then(|v| v.as_int()).is_some_and(|n| n > 0);
///
/// assert!(match_with_guards(&o.var("n"), &Value::from(3), &[&positive]).is_ok());
/// ```
pub trait Guard {
    /// Evaluate the guard.
    ///
    /// # Errors
    ///
    /// Returns the guard's own error if it could not be evaluated.
    fn check(&self) -> Result<bool, GuardError>;
}

impl<F: Fn() -> bool> Guard for F {
    fn check(&self) -> Result<bool, GuardError> {
        Ok(self())
    }
}

/// Adapter for guards that can fail.
///
/// ```
/// use destructure::{match_with_guards, BindingSet, Error, Fallible, Value};
///
/// let o = BindingSet::new();
/// let parse = Fallible(|| -> Result<bool, std::num::ParseIntError> {
///     let text = o.value("n").and_then(|v| v.as_str().map(str::to_owned)).unwrap_or_default();
///     Ok(text.parse::<i64>()? > 0)
/// });
///
/// let err = match_with_guards(&o.var("n"), &Value::from("x"), &[&parse]).unwrap_err();
/// assert!(matches!(err, Error::Guard(_)));
/// assert!(!o.is_bound("n"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Guard for Fallible<F>
where
    F: Fn() -> Result<bool, E>,
    E: Into<GuardError>,
{
    fn check(&self) -> Result<bool, GuardError> {
        (self.0)().map_err(Into::into)
    }
}
