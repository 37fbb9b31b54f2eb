//! Typed collection targets and scalar coercion.
//!
//! The deserializer populates arbitrary container types through the
//! [`Collection`] trait: the container declares its element type and
//! whether its elements occupy stable, replaceable positions. Containers
//! that only support append (sets) cannot honor forward alias
//! references and fail at the alias.
//!
//! The per-container shape is cheap to recompute but looked up on every
//! sequence, so it is memoized per `(container, element)` type pair for
//! the lifetime of one deserializer. The memo is lazy and idempotent;
//! recomputing on a race would produce the identical entry.

use std::any::TypeId;
use std::cell::RefCell;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::value::Value;

use super::error::DeError;

/// Conversion from a dynamic [`Value`] into a typed element.
///
/// Covers the host conversion rules the deserializer relies on: numeric
/// widening, string parsing, and (via downstream impls) string-to-enum.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, DeError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, DeError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, DeError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(DeError::Coerce {
                from: other.type_name(),
                to: "string",
            }),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, DeError> {
        match value {
            Value::Int(n) => Ok(n),
            Value::String(s) => s.parse().map_err(|_| DeError::Coerce {
                from: "string",
                to: "integer",
            }),
            other => Err(DeError::Coerce {
                from: other.type_name(),
                to: "integer",
            }),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, DeError> {
        match value {
            Value::Float(n) => Ok(n),
            // Numeric widening
            Value::Int(n) => Ok(n as f64),
            Value::String(s) => s.parse().map_err(|_| DeError::Coerce {
                from: "string",
                to: "float",
            }),
            other => Err(DeError::Coerce {
                from: other.type_name(),
                to: "float",
            }),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, DeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(DeError::Coerce {
                from: other.type_name(),
                to: "bool",
            }),
        }
    }
}

/// A container the structural deserializer can populate element-wise.
pub trait Collection: Default + 'static {
    type Item: FromValue + 'static;

    /// Whether elements occupy stable, replaceable positions. A forward
    /// alias reference reserves a position and fills it later, which an
    /// append-only container cannot honor.
    const SUPPORTS_OVERWRITE: bool;

    fn push_item(&mut self, item: Self::Item);
}

impl<T: FromValue + 'static> Collection for Vec<T> {
    type Item = T;

    const SUPPORTS_OVERWRITE: bool = true;

    fn push_item(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: FromValue + Eq + Hash + 'static> Collection for FxHashSet<T> {
    type Item = T;

    const SUPPORTS_OVERWRITE: bool = false;

    fn push_item(&mut self, item: T) {
        self.insert(item);
    }
}

/// Memoized per-container insertion shape.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CollectionShape {
    pub container: &'static str,
    pub supports_overwrite: bool,
}

#[derive(Default)]
pub(crate) struct ShapeCache {
    cache: RefCell<FxHashMap<(TypeId, TypeId), CollectionShape>>,
}

impl ShapeCache {
    pub(crate) fn lookup<C: Collection>(&self) -> CollectionShape {
        let key = (TypeId::of::<C>(), TypeId::of::<C::Item>());
        if let Some(shape) = self.cache.borrow().get(&key) {
            return *shape;
        }
        let shape = CollectionShape {
            container: std::any::type_name::<C>(),
            supports_overwrite: C::SUPPORTS_OVERWRITE,
        };
        self.cache.borrow_mut().insert(key, shape);
        shape
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_widening() {
        assert_eq!(f64::from_value(Value::Int(3)).unwrap(), 3.0);
        assert_eq!(i64::from_value(Value::Int(3)).unwrap(), 3);
        assert!(i64::from_value(Value::from("abc")).is_err());
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(String::from_value(Value::Int(42)).unwrap(), "42");
        assert_eq!(String::from_value(Value::from("x")).unwrap(), "x");
        assert!(String::from_value(Value::Seq(Vec::new())).is_err());
    }

    #[test]
    fn test_string_to_enum_via_custom_impl() {
        #[derive(Debug, Default, PartialEq)]
        enum Level {
            #[default]
            Info,
            Warn,
        }
        impl FromValue for Level {
            fn from_value(value: Value) -> Result<Self, DeError> {
                match value.as_str() {
                    Some("info") => Ok(Level::Info),
                    Some("warn") => Ok(Level::Warn),
                    _ => Err(DeError::Coerce {
                        from: "value",
                        to: "Level",
                    }),
                }
            }
        }

        assert_eq!(Level::from_value(Value::from("warn")).unwrap(), Level::Warn);
        assert!(Level::from_value(Value::Int(1)).is_err());
    }

    #[test]
    fn test_vec_is_positional() {
        let mut v: Vec<i64> = Vec::new();
        v.push_item(1);
        v.push_item(2);
        assert_eq!(v, vec![1, 2]);
        assert!(Vec::<i64>::SUPPORTS_OVERWRITE);
    }

    #[test]
    fn test_set_is_append_only() {
        let mut s: FxHashSet<String> = FxHashSet::default();
        s.push_item("a".to_string());
        s.push_item("a".to_string());
        assert_eq!(s.len(), 1);
        assert!(!FxHashSet::<String>::SUPPORTS_OVERWRITE);
    }

    #[test]
    fn test_shape_cache_memoizes() {
        let cache = ShapeCache::default();
        let first = cache.lookup::<Vec<i64>>();
        assert!(first.supports_overwrite);
        cache.lookup::<Vec<i64>>();
        assert_eq!(cache.len(), 1);

        let set = cache.lookup::<FxHashSet<String>>();
        assert!(!set.supports_overwrite);
        assert_eq!(cache.len(), 2);
    }
}
