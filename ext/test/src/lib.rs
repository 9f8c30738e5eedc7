//! destructure-test: Test domain for conformance testing
//!
//! Provides structured object types and a fixture format for driving the
//! matcher from YAML.
//!
//! # Example
//!
//! ```
//! use destructure::{match_data, ObjectPattern, BindingSet, Value};
//! use destructure_test::Point;
//!
//! let o = BindingSet::new();
//! let schema = ObjectPattern::of::<Point>().field("x", 1).field("y", o.var("y")).into();
//!
//! match_data(&schema, &Value::object(Point::new(1, 2))).unwrap();
//! assert_eq!(o.value("y"), Some(Value::from(2)));
//! ```

use destructure::{Structured, TypeTag, Value};
use std::any::Any;
use std::collections::BTreeMap;

pub mod config;
pub mod fixture;

/// Map key marking an encoded object in fixture data.
pub const OBJECT_KEY: &str = "$object";

/// Two-dimensional point. Equal when both coordinates are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: Value,
    pub y: Value,
}

impl Point {
    #[must_use]
    pub fn new(x: impl Into<Value>, y: impl Into<Value>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl Structured for Point {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn attribute_names(&self) -> Vec<String> {
        vec!["x".into(), "y".into()]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(self.x.clone()),
            "y" => Some(self.y.clone()),
            _ => None,
        }
    }

    fn eq_object(&self, other: &dyn Structured) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Three-dimensional point, a subtype of [`Point`].
///
/// Attributes starting with `_` are private and carried alongside the coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Point3 {
    pub x: Value,
    pub y: Value,
    pub z: Value,
    pub private: BTreeMap<String, Value>,
}

impl Point3 {
    #[must_use]
    pub fn new(x: impl Into<Value>, y: impl Into<Value>, z: impl Into<Value>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
            private: BTreeMap::new(),
        }
    }
}

impl Structured for Point3 {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn supertypes(&self) -> Vec<TypeTag> {
        vec![TypeTag::of::<Point>()]
    }

    fn attribute_names(&self) -> Vec<String> {
        ["x", "y", "z"]
            .into_iter()
            .map(String::from)
            .chain(self.private.keys().cloned())
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(self.x.clone()),
            "y" => Some(self.y.clone()),
            "z" => Some(self.z.clone()),
            _ => self.private.get(name).cloned(),
        }
    }

    fn eq_object(&self, other: &dyn Structured) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| o.x == self.x && o.y == self.y && o.z == self.z)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Object classes known to fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum Class {
    Point,
    Point3,
}

impl Class {
    #[must_use]
    pub fn type_tag(self) -> TypeTag {
        match self {
            Self::Point => TypeTag::of::<Point>(),
            Self::Point3 => TypeTag::of::<Point3>(),
        }
    }
}

/// Turn fixture data into engine data, decoding encoded objects.
///
/// A map carrying [`OBJECT_KEY`] becomes an object of that class, built
/// from the map's remaining entries. Missing coordinates decode as `Null`.
#[must_use]
pub fn decode(value: Value) -> Value {
    match value {
        Value::Map(mut entries) => {
            let class = entries.remove(OBJECT_KEY);
            let mut entries: BTreeMap<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, decode(v)))
                .collect();
            let mut take = |name: &str| entries.remove(name).unwrap_or(Value::Null);
            match class.as_ref().and_then(Value::as_str) {
                Some("Point") => Value::object(Point::new(take("x"), take("y"))),
                Some("Point3") => {
                    let mut point = Point3::new(take("x"), take("y"), take("z"));
                    point.private = entries;
                    Value::object(point)
                }
                _ => {
                    if let Some(class) = class {
                        entries.insert(OBJECT_KEY.to_string(), class);
                    }
                    Value::Map(entries)
                }
            }
        }
        Value::List(items) => Value::List(items.into_iter().map(decode).collect()),
        other => other,
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::config::SchemaConfig;
    pub use super::fixture::Fixture;
    pub use super::{decode, Class, Point, Point3};
    pub use destructure::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_point() {
        let data = Value::map([
            (OBJECT_KEY, "Point".into()),
            ("x", 1.into()),
            ("y", 2.into()),
        ]);
        let decoded = decode(data);
        assert_eq!(decoded.downcast_ref::<Point>(), Some(&Point::new(1, 2)));
    }

    #[test]
    fn test_decode_point3_keeps_private_attributes() {
        let data = Value::map([
            (OBJECT_KEY, "Point3".into()),
            ("x", 1.into()),
            ("_tag", "hidden".into()),
        ]);
        let decoded = decode(data);
        let point = decoded.downcast_ref::<Point3>().unwrap();
        assert_eq!(point.y, Value::Null);
        assert_eq!(point.private.get("_tag"), Some(&Value::from("hidden")));
    }

    #[test]
    fn test_decode_nested() {
        let data = Value::list([Value::map([
            ("p", Value::map([(OBJECT_KEY, "Point".into())])),
        ])]);
        let decoded = decode(data);
        let inner = match &decoded {
            Value::List(items) => items[0].get("p").unwrap(),
            other => panic!("expected list, got {other:?}"),
        };
        assert!(inner.downcast_ref::<Point>().is_some());
    }

    #[test]
    fn test_point_equality() {
        assert!(Point::new(1, 2).eq_object(&Point::new(1, 2)));
        assert!(!Point::new(1, 2).eq_object(&Point::new(1, 3)));
        assert!(!Point::new(1, 2).eq_object(&Point3::new(1, 2, 3)));
    }
}
