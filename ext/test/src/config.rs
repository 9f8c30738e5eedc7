//! Config types for schema construction.
//!
//! These types mirror the runtime [`Schema`] variants but are
//! serde-deserializable, so fixtures can describe schemas in YAML.
//!
//! | Config | Runtime |
//! |--------|---------|
//! | `{type: any}` | [`Schema::Any`] |
//! | `{type: literal, value: ...}` | [`Schema::from`]`(Value)` |
//! | `{type: kind, kind: int}` | [`Schema::Type`] |
//! | `{type: bind, name: x}` | `bindings.var(name)` |
//! | `{type: map, entries: {...}, rest: ...}` | [`Schema::Map`] |
//! | `{type: seq, items: [...], tuple: false}` | [`Schema::Seq`] |
//! | `{type: object, class: Point, fields: {...}}` | [`Schema::Object`] |

use crate::{decode, Class};
use destructure::{BindingSet, MapPattern, ObjectPattern, Schema, Type, Value};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration for a [`Schema`].
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaConfig {
    /// Wildcard.
    Any,

    /// Data that must appear exactly. Containers become structural schemas;
    /// encoded objects become instance patterns.
    Literal {
        /// The expected data.
        value: Value,
    },

    /// Type check.
    Kind {
        /// The expected type.
        kind: KindConfig,
    },

    /// Capture into the fixture's binding set.
    Bind {
        /// Name to bind.
        name: String,
    },

    /// Keyed collection.
    Map {
        /// Enumerated keys.
        #[serde(default)]
        entries: BTreeMap<String, SchemaConfig>,
        /// Rest entry for keys not enumerated.
        #[serde(default)]
        rest: Option<Box<SchemaConfig>>,
    },

    /// Ordered sequence.
    Seq {
        /// Item schemas; `{type: any}` marks the gap.
        #[serde(default)]
        items: Vec<SchemaConfig>,
        /// Written as a tuple rather than a list.
        #[serde(default)]
        tuple: bool,
    },

    /// Structured object, field by field.
    Object {
        /// Required concrete class.
        class: Class,
        /// Field schemas.
        #[serde(default)]
        fields: BTreeMap<String, SchemaConfig>,
    },
}

/// Type references available to fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindConfig {
    Null,
    Bool,
    Int,
    Float,
    Number,
    Text,
    Bytes,
    List,
    Tuple,
    Sequence,
    Map,
    Point,
    Point3,
}

impl From<KindConfig> for Type {
    fn from(kind: KindConfig) -> Self {
        match kind {
            KindConfig::Null => Type::Null,
            KindConfig::Bool => Type::Bool,
            KindConfig::Int => Type::Int,
            KindConfig::Float => Type::Float,
            KindConfig::Number => Type::Number,
            KindConfig::Text => Type::Text,
            KindConfig::Bytes => Type::Bytes,
            KindConfig::List => Type::List,
            KindConfig::Tuple => Type::Tuple,
            KindConfig::Sequence => Type::Sequence,
            KindConfig::Map => Type::Map,
            KindConfig::Point => Type::Object(Class::Point.type_tag()),
            KindConfig::Point3 => Type::Object(Class::Point3.type_tag()),
        }
    }
}

impl SchemaConfig {
    /// Build a runtime schema, binding placeholders into `bindings`.
    ///
    /// Names already bound in `bindings` compile to literals.
    #[must_use]
    pub fn build(&self, bindings: &BindingSet) -> Schema {
        match self {
            Self::Any => Schema::Any,
            Self::Literal { value } => Schema::from(decode(value.clone())),
            Self::Kind { kind } => Schema::Type((*kind).into()),
            Self::Bind { name } => bindings.var(name),
            Self::Map { entries, rest } => {
                let mut pattern = entries
                    .iter()
                    .fold(MapPattern::new(), |p, (k, v)| p.entry(k.as_str(), v.build(bindings)));
                if let Some(rest) = rest {
                    pattern = pattern.rest(rest.build(bindings));
                }
                pattern.into()
            }
            Self::Seq { items, tuple } => {
                let items = items.iter().map(|item| item.build(bindings));
                if *tuple {
                    Schema::tuple(items)
                } else {
                    Schema::list(items)
                }
            }
            Self::Object { class, fields } => fields
                .iter()
                .fold(ObjectPattern::new(class.type_tag()), |p, (k, v)| {
                    p.field(k.as_str(), v.build(bindings))
                })
                .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> SchemaConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_nested() {
        let config = parse(
            r"
type: map
entries:
  id: {type: kind, kind: int}
  tags:
    type: seq
    items: [{type: bind, name: first}, {type: any}]
rest: {type: any}
",
        );
        let o = BindingSet::new();
        let schema = config.build(&o);
        assert_eq!(format!("{schema:?}"), r#"{"id": int, "tags": [<unbound first>, ...], ...: ...}"#);
    }

    #[test]
    fn test_bound_name_builds_literal() {
        let o = BindingSet::new().with("x", 3);
        let schema = parse("{type: bind, name: x}").build(&o);
        assert!(matches!(schema, Schema::Literal(Value::Int(3))));
    }

    #[test]
    fn test_literal_container_is_structural() {
        let schema = parse("{type: literal, value: [1, 2]}").build(&BindingSet::new());
        assert!(matches!(schema, Schema::Seq(_)));
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_yaml::from_str::<SchemaConfig>("{type: regex}").is_err());
    }
}
