//! `Schema` — Expected shape of data
//!
//! A schema is a closed sum type with one variant per shape. The matcher
//! dispatches on the variant, never on the data, so the order in which shapes
//! are tried is fixed by the enum itself.
//!
//! | Variant | Matches |
//! |---------|---------|
//! | [`Schema::Bind`] | anything, capturing it under a name |
//! | [`Schema::Any`] | anything (a gap when inside a sequence) |
//! | [`Schema::Type`] | instances of a [`Type`] |
//! | [`Schema::Literal`] | equal scalars |
//! | [`Schema::Map`] | maps with a compatible key set |
//! | [`Schema::Seq`] | sequences of a compatible length |
//! | [`Schema::Object`] | structured objects of the same type |

use crate::{
    BindingSet, Placeholder, SchemaError, SeqKind, Slot, Structured, TypeTag, Value, MAX_DEPTH,
    PRIVATE_PREFIX,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Expected shape of a data value.
///
/// # Example
///
/// ```
/// use destructure::{BindingSet, MapPattern, Schema, Type, Value};
///
/// let o = BindingSet::new();
/// let schema: Schema = MapPattern::new()
///     .entry("string", Type::Text)
///     .entry("any", Schema::Any)
///     .entry("binding", o.var("name"))
///     .entry("sequence", Schema::list([1.into(), 2.into(), Schema::Any]))
///     .entry("mapping", MapPattern::new().entry("a", Type::Int).rest(Schema::Any))
///     .into();
///
/// let data = Value::map([
///     ("string", Value::from("a")),
///     ("any", Value::from(5.5)),
///     ("binding", Value::from(42)),
///     ("sequence", Value::list([1.into(), 2.into(), 3.into(), 4.into()])),
///     ("mapping", Value::map([("a", 1.into()), ("b", 2.into()), ("c", 3.into())])),
/// ]);
///
/// assert_eq!(schema.destructure(&data).unwrap(), data);
/// assert_eq!(o.value("name"), Some(Value::from(42)));
/// ```
#[derive(Clone)]
pub enum Schema {
    /// Capture the data under a name.
    Bind(Placeholder),
    /// Match any single value. Inside a sequence, a variable-length gap.
    Any,
    /// Match instances of a type.
    Type(Type),
    /// Match values equal to this one.
    Literal(Value),
    /// Match a keyed collection.
    Map(MapPattern),
    /// Match an ordered sequence.
    Seq(SeqPattern),
    /// Match a structured object attribute by attribute.
    Object(ObjectPattern),
}

impl Schema {
    /// List schema.
    pub fn list(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::Seq(SeqPattern::new(SeqKind::List, items))
    }

    /// Tuple schema.
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::Seq(SeqPattern::new(SeqKind::Tuple, items))
    }

    /// Start a keyed-collection schema. Shorthand for [`MapPattern::new`].
    #[must_use]
    pub fn map() -> MapPattern {
        MapPattern::new()
    }

    /// Returns `true` for the wildcard.
    #[inline]
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Nesting depth. Leaves have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let children = match self {
            Self::Bind(_) | Self::Any | Self::Type(_) | Self::Literal(_) => 0,
            Self::Map(m) => m
                .entries
                .values()
                .chain(m.rest.as_deref())
                .map(Schema::depth)
                .max()
                .unwrap_or(0),
            Self::Seq(s) => s.items.iter().map(Schema::depth).max().unwrap_or(0),
            Self::Object(o) => o.fields.iter().map(|(_, s)| s.depth()).max().unwrap_or(0),
        };
        1 + children
    }

    /// Validate this schema against the engine's rules without touching data.
    ///
    /// Checks:
    /// - Nesting depth does not exceed [`MAX_DEPTH`]
    /// - No sequence contains more than one wildcard
    /// - Placeholders come from at most one [`BindingSet`]
    ///
    /// Every match runs this first, so a malformed schema is reported as a
    /// [`SchemaError`] regardless of the data.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated.
    pub fn validate(&self) -> Result<Option<BindingSet>, SchemaError> {
        let mut found = None;
        self.validate_at(1, &mut found)?;
        Ok(found)
    }

    fn validate_at(&self, depth: usize, found: &mut Option<BindingSet>) -> Result<(), SchemaError> {
        if depth > MAX_DEPTH {
            return Err(SchemaError::DepthExceeded { max: MAX_DEPTH });
        }
        match self {
            Self::Bind(p) => {
                let set = found.get_or_insert_with(|| p.binding_set().clone());
                if !set.ptr_eq(p.binding_set()) {
                    return Err(SchemaError::MultipleBindingSets);
                }
            }
            Self::Any | Self::Type(_) | Self::Literal(_) => {}
            Self::Map(m) => {
                for nested in m.entries.values().chain(m.rest.as_deref()) {
                    nested.validate_at(depth + 1, found)?;
                }
            }
            Self::Seq(s) => {
                let count = s.items.iter().filter(|item| item.is_any()).count();
                if count > 1 {
                    return Err(SchemaError::MultipleWildcards { count });
                }
                for nested in &s.items {
                    nested.validate_at(depth + 1, found)?;
                }
            }
            Self::Object(o) => {
                for (_, nested) in o.public_fields() {
                    nested.validate_at(depth + 1, found)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(p) => fmt::Debug::fmt(p, f),
            Self::Any => f.write_str("..."),
            Self::Type(t) => f.write_str(&t.name()),
            Self::Literal(v) => fmt::Debug::fmt(v, f),
            Self::Map(m) => fmt::Debug::fmt(m, f),
            Self::Seq(s) => fmt::Debug::fmt(s, f),
            Self::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Reference to a runtime type.
///
/// `Number` accepts `Int` and `Float`; `Sequence` accepts `List` and `Tuple`;
/// `Object(tag)` accepts objects of type `tag` or listing `tag` among their
/// [`supertypes`](Structured::supertypes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// `Value::Null`.
    Null,
    /// `Value::Bool`.
    Bool,
    /// `Value::Int`.
    Int,
    /// `Value::Float`.
    Float,
    /// `Value::Int` or `Value::Float`.
    Number,
    /// `Value::Text`.
    Text,
    /// `Value::Bytes`.
    Bytes,
    /// `Value::List`.
    List,
    /// `Value::Tuple`.
    Tuple,
    /// `Value::List` or `Value::Tuple`.
    Sequence,
    /// `Value::Map`.
    Map,
    /// Structured objects of this type or a subtype.
    Object(TypeTag),
}

impl Type {
    /// Reference to the structured type `T`.
    #[must_use]
    pub fn of<T: Structured>() -> Self {
        Self::Object(TypeTag::of::<T>())
    }

    /// Returns `true` if `data` is an instance of this type.
    #[must_use]
    pub fn accepts(&self, data: &Value) -> bool {
        match (self, data) {
            (Self::Null, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_))
            | (Self::Number, Value::Int(_) | Value::Float(_))
            | (Self::Text, Value::Text(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::List, Value::List(_))
            | (Self::Tuple, Value::Tuple(_))
            | (Self::Sequence, Value::List(_) | Value::Tuple(_))
            | (Self::Map, Value::Map(_)) => true,
            (Self::Object(tag), Value::Object(obj)) => {
                obj.type_tag() == *tag || obj.supertypes().contains(tag)
            }
            _ => false,
        }
    }

    /// Name used in error messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool => "bool".into(),
            Self::Int => "int".into(),
            Self::Float => "float".into(),
            Self::Number => "number".into(),
            Self::Text => "text".into(),
            Self::Bytes => "bytes".into(),
            Self::List => "list".into(),
            Self::Tuple => "tuple".into(),
            Self::Sequence => "sequence".into(),
            Self::Map => "map".into(),
            Self::Object(tag) => tag.short_name().into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Keyed collections
// ═══════════════════════════════════════════════════════════════════════════════

/// Schema for a keyed collection.
///
/// The optional **rest entry** describes keys the schema does not enumerate:
///
/// - rest is [`Schema::Any`] — any number (at least one) of extra items, accepted verbatim
/// - rest is anything else — exactly one extra item, matched against the rest schema
///
/// The rest entry is a dedicated field, not a key, so no data key can collide with it.
#[derive(Clone, Default)]
pub struct MapPattern {
    /// Enumerated keys and their schemas.
    pub entries: BTreeMap<String, Schema>,
    /// Schema for keys not enumerated.
    pub rest: Option<Box<Schema>>,
}

impl MapPattern {
    /// Create a pattern with no entries and no rest entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enumerated key (builder pattern).
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.entries.insert(key.into(), schema.into());
        self
    }

    /// Set the rest entry (builder pattern).
    #[must_use]
    pub fn rest(mut self, schema: impl Into<Schema>) -> Self {
        self.rest = Some(Box::new(schema.into()));
        self
    }
}

impl fmt::Debug for MapPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        map.entries(&self.entries);
        if let Some(rest) = &self.rest {
            map.key(&format_args!("...")).value(rest);
        }
        map.finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Ordered sequences
// ═══════════════════════════════════════════════════════════════════════════════

/// Schema for an ordered sequence.
///
/// At most one item may be [`Schema::Any`], marking a variable-length gap.
/// The container kind only affects rendering: list schemas match tuple data
/// and vice versa, and the result keeps the data's kind.
#[derive(Clone)]
pub struct SeqPattern {
    /// Container kind the schema was written as.
    pub kind: SeqKind,
    /// Item schemas.
    pub items: Vec<Schema>,
}

impl SeqPattern {
    /// Create a sequence pattern.
    pub fn new(kind: SeqKind, items: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            kind,
            items: items.into_iter().collect(),
        }
    }

    /// Position of the wildcard, if any.
    #[must_use]
    pub fn wildcard(&self) -> Option<usize> {
        self.items.iter().position(Schema::is_any)
    }
}

impl fmt::Debug for SeqPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_items(f, self.kind, &self.items)
    }
}

/// Render schema items in the notation of `kind`.
pub(crate) fn fmt_items(f: &mut fmt::Formatter<'_>, kind: SeqKind, items: &[Schema]) -> fmt::Result {
    match kind {
        SeqKind::List => f.debug_list().entries(items).finish(),
        SeqKind::Tuple => {
            let mut t = f.debug_tuple("");
            for item in items {
                t.field(item);
            }
            t.finish()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Structured objects
// ═══════════════════════════════════════════════════════════════════════════════

/// Schema for a structured object.
///
/// Requires data of exactly the pattern's type, then matches each public
/// field (names not starting with [`PRIVATE_PREFIX`]) against the data
/// object's attribute of the same name.
///
/// A pattern built with [`from_instance`](Self::from_instance) first compares
/// the instance to the data with [`Structured::eq_object`] and succeeds
/// without reading attributes when they are equal.
///
/// # Example
///
/// ```ignore
/// let o = BindingSet::new();
/// let schema = ObjectPattern::of::<Point>().field("x", 1).field("y", o.var("y"));
/// match_data(&schema.into(), &Value::object(Point { x: 1, y: 2 }))?;
/// assert_eq!(o.value("y"), Some(Value::from(2)));
/// ```
#[derive(Clone)]
pub struct ObjectPattern {
    tag: TypeTag,
    fields: Vec<(String, Schema)>,
    instance: Option<Arc<dyn Structured>>,
}

impl ObjectPattern {
    /// Pattern for objects of type `tag`, with no fields yet.
    #[must_use]
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            fields: Vec::new(),
            instance: None,
        }
    }

    /// Pattern for objects of type `T`, with no fields yet.
    #[must_use]
    pub fn of<T: Structured>() -> Self {
        Self::new(TypeTag::of::<T>())
    }

    /// Pattern requiring every attribute of `instance`, with the equality shortcut.
    #[must_use]
    pub fn from_instance(instance: Arc<dyn Structured>) -> Self {
        let fields = instance
            .attribute_names()
            .into_iter()
            .filter_map(|name| {
                let value = instance.attribute(&name)?;
                Some((name, Schema::from(value)))
            })
            .collect();
        Self {
            tag: instance.type_tag(),
            fields,
            instance: Some(instance),
        }
    }

    /// Set a field's schema (builder pattern).
    ///
    /// Replaces an existing field of the same name. The pattern no longer
    /// stands for a plain instance, so the equality shortcut is dropped.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let name = name.into();
        let schema = schema.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self.instance = None;
        self
    }

    /// The required concrete type.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Instance for the equality shortcut, if any.
    #[must_use]
    pub fn instance(&self) -> Option<&Arc<dyn Structured>> {
        self.instance.as_ref()
    }

    /// Fields that take part in matching.
    pub fn public_fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields
            .iter()
            .filter(|(name, _)| !name.starts_with(PRIVATE_PREFIX))
            .map(|(name, schema)| (name.as_str(), schema))
    }
}

impl fmt::Debug for ObjectPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.tag.short_name());
        for (name, schema) in &self.fields {
            s.field(name, schema);
        }
        s.finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

/// Data converts to the schema that matches exactly that data.
impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        match value {
            Value::List(items) => Self::list(items.into_iter().map(Schema::from)),
            Value::Tuple(items) => Self::tuple(items.into_iter().map(Schema::from)),
            Value::Map(entries) => Self::Map(MapPattern {
                entries: entries
                    .into_iter()
                    .map(|(k, v)| (k, Schema::from(v)))
                    .collect(),
                rest: None,
            }),
            Value::Object(obj) => Self::Object(ObjectPattern::from_instance(obj)),
            scalar => Self::Literal(scalar),
        }
    }
}

/// A bound slot is a literal; an unbound slot is a capture.
impl From<Slot> for Schema {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Bound(value) => Self::from(value),
            Slot::Unbound(placeholder) => Self::Bind(placeholder),
        }
    }
}

impl From<Placeholder> for Schema {
    fn from(placeholder: Placeholder) -> Self {
        Self::Bind(placeholder)
    }
}

impl From<Type> for Schema {
    fn from(t: Type) -> Self {
        Self::Type(t)
    }
}

impl From<MapPattern> for Schema {
    fn from(m: MapPattern) -> Self {
        Self::Map(m)
    }
}

impl From<SeqPattern> for Schema {
    fn from(s: SeqPattern) -> Self {
        Self::Seq(s)
    }
}

impl From<ObjectPattern> for Schema {
    fn from(o: ObjectPattern) -> Self {
        Self::Object(o)
    }
}

macro_rules! literal_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Schema {
                fn from(v: $t) -> Self {
                    Self::Literal(Value::from(v))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, f64, &str, String, &[u8]);
