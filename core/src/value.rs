//! `Value` — The in-memory data that schemas are matched against
//!
//! Data arrives already materialized (typically parsed from JSON). The engine
//! never parses anything itself; it only walks a `Value` tree.
//!
//! # Extensibility via `Object`
//!
//! Domain types that are not plain maps or sequences implement [`Structured`]
//! and are wrapped as `Value::Object(Arc::new(your_type))`. The matcher reads
//! their public attributes by name, so an [`ObjectPattern`](crate::ObjectPattern)
//! can capture values nested inside them.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Runtime identity of a [`Structured`] type.
///
/// Tags compare by [`TypeId`]; the name is carried for error messages only.
///
/// # Example
///
/// ```
/// use destructure::TypeTag;
///
/// struct Point;
/// struct Size;
///
/// assert_eq!(TypeTag::of::<Point>(), TypeTag::of::<Point>());
/// assert_ne!(TypeTag::of::<Point>(), TypeTag::of::<Size>());
/// assert!(TypeTag::of::<Point>().name().ends_with("Point"));
/// ```
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for the concrete type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name (`Point` for `my_crate::geo::Point`).
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl std::hash::Hash for TypeTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A user type whose named attributes can be matched structurally.
///
/// Implementations expose their *public* attributes by name. The matcher
/// never calls methods; it only reads attribute values.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: data values may be matched from
/// several threads at once.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use destructure::{Structured, TypeTag, Value};
///
/// #[derive(Debug)]
/// struct Point { x: i64, y: i64 }
///
/// impl Structured for Point {
///     fn type_tag(&self) -> TypeTag { TypeTag::of::<Self>() }
///
///     fn attribute_names(&self) -> Vec<String> {
///         vec!["x".into(), "y".into()]
///     }
///
///     fn attribute(&self, name: &str) -> Option<Value> {
///         match name {
///             "x" => Some(self.x.into()),
///             "y" => Some(self.y.into()),
///             _ => None,
///         }
///     }
///
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let value = Value::object(Point { x: 1, y: 2 });
/// assert!(value.is_object());
/// ```
pub trait Structured: Send + Sync + Debug + 'static {
    /// Concrete type of this object.
    fn type_tag(&self) -> TypeTag;

    /// Ancestor types this object is also an instance of.
    ///
    /// Consulted by [`Type::Object`](crate::Type::Object) checks only; object
    /// patterns always require the exact concrete type.
    fn supertypes(&self) -> Vec<TypeTag> {
        Vec::new()
    }

    /// Names of the attributes this object carries, private ones included.
    fn attribute_names(&self) -> Vec<String>;

    /// Value of the named attribute, or `None` if the object has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Object equality. Defaults to identity.
    fn eq_object(&self, other: &dyn Structured) -> bool {
        std::ptr::addr_eq(self as *const Self, other as *const dyn Structured)
    }

    /// Returns `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Concrete ordered-sequence container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Growable list (JSON arrays).
    List,
    /// Fixed tuple.
    Tuple,
}

/// Data value.
///
/// # Equality
///
/// - `Int` and `Float` compare numerically (`Int(1) == Float(1.0)`)
/// - `Bool` never equals a number
/// - `List` and `Tuple` never equal each other
/// - `Object` defers to [`Structured::eq_object`]
///
/// # Example
///
/// ```
/// use destructure::Value;
///
/// let v = Value::list([Value::from(1), Value::from("two")]);
/// assert_eq!(v.len(), Some(2));
/// assert_eq!(Value::from(1), Value::from(1.0));
/// assert_ne!(Value::from(true), Value::from(1));
/// ```
#[derive(Clone)]
pub enum Value {
    /// Absence of a value (JSON `null`).
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered, growable sequence.
    List(Vec<Value>),
    /// Ordered, fixed sequence.
    Tuple(Vec<Value>),
    /// Keyed collection.
    Map(BTreeMap<String, Value>),
    /// User type with named attributes.
    Object(Arc<dyn Structured>),
}

impl Value {
    /// Build a list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Build a tuple.
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Build a map.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap a structured object.
    pub fn object(object: impl Structured) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Human-readable name of this value's runtime kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Object(obj) => obj.type_tag().short_name(),
        }
    }

    /// Returns `true` for `Null`, `Bool`, `Int`, `Float`, `Text` and `Bytes`.
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Bool(_)
                | Self::Int(_)
                | Self::Float(_)
                | Self::Text(_)
                | Self::Bytes(_)
        )
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is the `Object` variant.
    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Elements and container kind, if this is an ordered sequence.
    ///
    /// Text and bytes are scalars here even though they are iterable.
    #[must_use]
    pub fn as_sequence(&self) -> Option<(SeqKind, &[Value])> {
        match self {
            Self::List(items) => Some((SeqKind::List, items)),
            Self::Tuple(items) => Some((SeqKind::Tuple, items)),
            _ => None,
        }
    }

    /// Try to get the value as a map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers widen.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a structured object.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Arc<dyn Structured>> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Downcast an `Object` value to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Structured>(&self) -> Option<&T> {
        self.as_object()?.as_any().downcast_ref::<T>()
    }

    /// Number of elements for sequences and maps.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items.len()),
            Self::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Look up a key in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

// Int/Float compare numerically; everything else compares within its own variant.
impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => int_eq_float(*a, *b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                a.type_tag() == b.type_tag() && a.eq_object(b.as_ref())
            }
            _ => false,
        }
    }
}

/// Exact comparison: the float must be a whole number inside the `i64` range.
/// Casting the integer to `f64` instead would round above 2^53.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn int_eq_float(i: i64, f: f64) -> bool {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Tuple(items) => {
                let mut t = f.debug_tuple("");
                for item in items {
                    t.field(item);
                }
                t.finish()
            }
            Self::Map(m) => f.debug_map().entries(m).finish(),
            Self::Object(obj) => Debug::fmt(obj.as_ref(), f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
