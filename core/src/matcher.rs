//! Matcher — Recursive schema/data walk
//!
//! Walks schema and data in lockstep, dispatching on the schema's variant.
//! Every sub-routine fails immediately on the first mismatch; unwinding the
//! bindings made so far is the session's job, not the matcher's.

use crate::schema::fmt_items;
use crate::session::Session;
use crate::{
    Guard, MapPattern, MatchError, ObjectPattern, Result, Schema, SeqKind, Type, Value,
};
use std::fmt;
use tracing::trace;

/// Verify that `data` has the shape described by `schema`, binding placeholders.
///
/// Returns the data on success. On failure no binding made by this call
/// remains, and the binding set is free for the next match.
///
/// # Errors
///
/// - [`Error::Match`](crate::Error::Match) — the data does not conform
/// - [`Error::Schema`](crate::Error::Schema) — the schema is malformed (checked before any data is read)
/// - [`Error::Bind`](crate::Error::Bind) — a placeholder's name was already bound
///
/// # Example
///
/// ```
/// use destructure::{match_data, BindingSet, MapPattern, Schema, Type, Value};
///
/// let o = BindingSet::new();
/// let schema: Schema = MapPattern::new()
///     .entry("a", 1)
///     .entry("b", Type::Int)
///     .entry("c", o.var("c"))
///     .into();
///
/// let data = Value::map([("a", 1.into()), ("b", 2.into()), ("c", 3.into())]);
/// assert_eq!(match_data(&schema, &data).unwrap(), data);
/// assert_eq!(o.value("c"), Some(Value::from(3)));
///
/// let short = Value::map([("a", 1.into()), ("b", 2.into())]);
/// assert!(match_data(&schema, &short).unwrap_err().is_mismatch());
/// ```
pub fn match_data(schema: &Schema, data: &Value) -> Result<Value> {
    Session::run(schema, data, &[])
}

/// Like [`match_data`], then require every guard to hold.
///
/// Guards run in order after the structure has matched, while the new
/// bindings are visible. A guard returning `false` fails the match with
/// [`MatchError::GuardRejected`] and the bindings are unwound.
///
/// Guards must not start another match on the same binding set.
///
/// # Errors
///
/// As [`match_data`], plus [`Error::Guard`](crate::Error::Guard) when a
/// [`Fallible`](crate::Fallible) guard fails.
pub fn match_with_guards(schema: &Schema, data: &Value, guards: &[&dyn Guard]) -> Result<Value> {
    Session::run(schema, data, guards)
}

impl Schema {
    /// Match `data` against this schema. Shorthand for [`match_data`].
    ///
    /// # Errors
    ///
    /// See [`match_data`].
    pub fn destructure(&self, data: &Value) -> Result<Value> {
        match_data(self, data)
    }
}

impl<'s> Session<'s> {
    pub(crate) fn match_schema(&mut self, schema: &'s Schema, data: &Value) -> Result<Value> {
        match schema {
            Schema::Bind(placeholder) => self.bind(placeholder, data),
            Schema::Any => Ok(data.clone()),
            Schema::Type(t) => match_type(*t, data),
            Schema::Literal(expected) => match_literal(expected, data),
            Schema::Map(pattern) => self.match_map(pattern, data),
            Schema::Seq(pattern) => {
                let Some((kind, items)) = data.as_sequence() else {
                    return Err(MatchError::ExpectedSequence { found: data.kind() }.into());
                };
                let matched = self.match_items(pattern.kind, &pattern.items, items)?;
                Ok(match kind {
                    SeqKind::List => Value::List(matched),
                    SeqKind::Tuple => Value::Tuple(matched),
                })
            }
            Schema::Object(pattern) => self.match_object(pattern, data),
        }
    }

    /// Keyed collections: every enumerated key must be present; extra keys
    /// are only allowed through the rest entry.
    fn match_map(&mut self, pattern: &'s MapPattern, data: &Value) -> Result<Value> {
        let Value::Map(entries) = data else {
            return Err(MatchError::ExpectedMap { found: data.kind() }.into());
        };

        let missing: Vec<String> = pattern
            .entries
            .keys()
            .filter(|key| !entries.contains_key(*key))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MatchError::MissingKeys { keys: missing }.into());
        }

        let excess: Vec<&String> = entries
            .keys()
            .filter(|key| !pattern.entries.contains_key(*key))
            .collect();

        let rest_item = match pattern.rest.as_deref() {
            None if excess.is_empty() => None,
            None => {
                return Err(MatchError::UnexpectedKeys {
                    keys: excess.into_iter().cloned().collect(),
                }
                .into());
            }
            Some(rest) if excess.is_empty() => {
                return Err(MatchError::NoExtraItems {
                    rest: format!("{rest:?}"),
                }
                .into());
            }
            // A wildcard rest entry takes every extra item verbatim.
            Some(Schema::Any) => None,
            Some(rest) if excess.len() == 1 => Some((rest, &entries[excess[0]])),
            Some(rest) => {
                return Err(MatchError::TooManyExtraItems {
                    rest: format!("{rest:?}"),
                    keys: excess.into_iter().cloned().collect(),
                }
                .into());
            }
        };

        for (key, nested) in &pattern.entries {
            self.match_schema(nested, &entries[key])?;
        }
        if let Some((rest, value)) = rest_item {
            self.match_schema(rest, value)?;
        }
        Ok(data.clone())
    }

    /// Ordered sequences, with at most one wildcard marking a gap.
    ///
    /// The wildcard splits the schema; each side is matched against the data
    /// slice of the same length taken from the matching end, and whatever the
    /// gap covers is passed through unvalidated.
    fn match_items(&mut self, kind: SeqKind, items: &'s [Schema], data: &[Value]) -> Result<Vec<Value>> {
        if items.is_empty() && !data.is_empty() {
            return Err(MatchError::ExpectedEmpty {
                data: rebuild(kind, data),
            }
            .into());
        }

        let Some(gap) = items.iter().position(Schema::is_any) else {
            let (n, m) = (items.len(), data.len());
            if n > m {
                return Err(MatchError::MissingValues {
                    missing: format!("{:?}", Items(kind, &items[m..])),
                }
                .into());
            }
            if m > n {
                return Err(MatchError::UnexpectedValues {
                    values: data[n..].to_vec(),
                }
                .into());
            }
            return items
                .iter()
                .zip(data)
                .map(|(nested, value)| self.match_schema(nested, value))
                .collect();
        };

        let last = items.len() - 1;
        if gap == last {
            let head = &data[..last.min(data.len())];
            trace!(prefix = head.len(), gap = data.len() - head.len(), "sequence gap at end");
            let mut matched = self.match_items(kind, &items[..last], head)?;
            matched.extend_from_slice(&data[head.len()..]);
            Ok(matched)
        } else if gap == 0 {
            let start = data.len().saturating_sub(last);
            trace!(suffix = data.len() - start, gap = start, "sequence gap at start");
            let tail = self.match_items(kind, &items[1..], &data[start..])?;
            let mut matched = data[..start].to_vec();
            matched.extend(tail);
            Ok(matched)
        } else {
            let split = gap.min(data.len());
            trace!(split, "sequence gap in middle");
            let mut matched = self.match_items(kind, &items[..gap], &data[..split])?;
            matched.extend(self.match_items(kind, &items[gap..], &data[split..])?);
            Ok(matched)
        }
    }

    /// Structured objects: same concrete type, then attribute by attribute.
    fn match_object(&mut self, pattern: &'s ObjectPattern, data: &Value) -> Result<Value> {
        let expected = pattern.type_tag();
        let obj = match data {
            Value::Object(obj) if obj.type_tag() == expected => obj,
            _ => {
                return Err(MatchError::ObjectTypeMismatch {
                    expected: expected.short_name(),
                    found: data.kind(),
                }
                .into());
            }
        };

        if pattern
            .instance()
            .is_some_and(|instance| instance.eq_object(obj.as_ref()))
        {
            return Ok(data.clone());
        }

        for (name, nested) in pattern.public_fields() {
            let value = obj
                .attribute(name)
                .ok_or_else(|| MatchError::MissingAttribute {
                    type_name: expected.short_name(),
                    name: name.to_string(),
                })?;
            self.match_schema(nested, &value)?;
        }
        Ok(data.clone())
    }
}

fn match_type(expected: Type, data: &Value) -> Result<Value> {
    if expected.accepts(data) {
        Ok(data.clone())
    } else {
        Err(MatchError::TypeMismatch {
            expected: expected.name(),
            data: data.clone(),
        }
        .into())
    }
}

fn match_literal(expected: &Value, data: &Value) -> Result<Value> {
    if expected == data {
        Ok(data.clone())
    } else {
        Err(MatchError::LiteralMismatch {
            expected: expected.clone(),
            data: data.clone(),
        }
        .into())
    }
}

fn rebuild(kind: SeqKind, items: &[Value]) -> Value {
    match kind {
        SeqKind::List => Value::List(items.to_vec()),
        SeqKind::Tuple => Value::Tuple(items.to_vec()),
    }
}

/// Schema items rendered for error messages.
struct Items<'a>(SeqKind, &'a [Schema]);

impl fmt::Debug for Items<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_items(f, self.0, self.1)
    }
}
