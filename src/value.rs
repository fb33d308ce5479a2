//! The value tree the decoder produces: a tagged variant carrying the
//! Hjson scalar/container kinds, plus the comment and position
//! decorations described in spec.md §3.

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// An insertion-ordered mapping from key to `Value`, with unique keys
/// (unless the configured duplicate-key policy permits otherwise).
pub type Map = IndexMap<String, Value>;

/// A node in the decoded tree. `Undefined` is not part of Hjson's own
/// grammar — it is the "freshly default-constructed placeholder" sentinel
/// spec.md §4.6 requires so that indexing a map by a missing key (used by
/// the duplicate-key check) can return something without allocating a
/// real entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Undefined,
    Null,
    Bool(bool),
    Int64(i64),
    Double(f64),
    String(String),
    Vector(Vec<Value>),
    Map(Map),
}

/// A `Kind` plus its four comment slots and two source positions.
///
/// - `comment_before`: trivia preceding the value (or its key, inside a map).
/// - `comment_key`: trivia between the key and the `:`.
/// - `comment_inside`: trivia between the opening and closing bracket of an
///   empty container (only ever set when the container is empty).
/// - `comment_after`: trivia following the value up to (and possibly
///   including) the next separator or newline.
/// - `pos_key`: byte offset of the key's start within a map, or `-1` for
///   non-map elements.
/// - `pos_item`: byte offset of the value's start.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: Kind,
    pub comment_before: String,
    pub comment_key: String,
    pub comment_inside: String,
    pub comment_after: String,
    pub pos_key: i64,
    pub pos_item: i64,
}

impl Value {
    pub fn undefined() -> Self {
        Value {
            kind: Kind::Undefined,
            comment_before: String::new(),
            comment_key: String::new(),
            comment_inside: String::new(),
            comment_after: String::new(),
            pos_key: -1,
            pos_item: -1,
        }
    }

    pub fn new(kind: Kind) -> Self {
        Value {
            kind,
            ..Value::undefined()
        }
    }

    pub fn null() -> Self {
        Value::new(Kind::Null)
    }

    pub fn bool(v: bool) -> Self {
        Value::new(Kind::Bool(v))
    }

    pub fn int64(v: i64) -> Self {
        Value::new(Kind::Int64(v))
    }

    pub fn double(v: f64) -> Self {
        Value::new(Kind::Double(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::new(Kind::String(v.into()))
    }

    pub fn vector() -> Self {
        Value::new(Kind::Vector(Vec::new()))
    }

    pub fn map() -> Self {
        Value::new(Kind::Map(Map::new()))
    }

    /// `true` iff this value is distinguishable from a freshly
    /// default-constructed placeholder.
    pub fn defined(&self) -> bool {
        !matches!(self.kind, Kind::Undefined)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Bool(_) => "bool",
            Kind::Int64(_) => "int64",
            Kind::Double(_) => "double",
            Kind::String(_) => "string",
            Kind::Vector(_) => "vector",
            Kind::Map(_) => "map",
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.kind {
            Kind::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match &mut self.kind {
            Kind::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match &self.kind {
            Kind::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            Kind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vec<Value>> {
        match &self.kind {
            Kind::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Typed accessors for host integrations built on top of the tree
    /// (spec.md §7): each raises `Error::TypeMismatch` against the wrong
    /// variant rather than panicking or silently coercing. The decoder
    /// itself never calls these — they exist for callers that want a
    /// `Result` instead of pattern-matching `Kind` by hand.
    ///
    /// # Errors
    /// Returns `Error::TypeMismatch` if this value is not a `Bool`.
    pub fn try_bool(&self) -> Result<bool> {
        match self.kind {
            Kind::Bool(b) => Ok(b),
            _ => Err(Error::TypeMismatch {
                expected: "bool",
                found: self.type_name(),
            }),
        }
    }

    /// # Errors
    /// Returns `Error::TypeMismatch` if this value is not an `Int64`.
    pub fn try_int64(&self) -> Result<i64> {
        match self.kind {
            Kind::Int64(v) => Ok(v),
            _ => Err(Error::TypeMismatch {
                expected: "int64",
                found: self.type_name(),
            }),
        }
    }

    /// # Errors
    /// Returns `Error::TypeMismatch` if this value is not a `String`.
    pub fn try_str(&self) -> Result<&str> {
        match &self.kind {
            Kind::String(s) => Ok(s),
            _ => Err(Error::TypeMismatch {
                expected: "string",
                found: self.type_name(),
            }),
        }
    }

    /// Indexes a vector by position.
    ///
    /// # Errors
    /// Returns `Error::TypeMismatch` if this value is not a `Vector`, or
    /// `Error::IndexOutOfBounds` if `index` is past its end.
    pub fn at(&self, index: usize) -> Result<&Value> {
        let vec = match &self.kind {
            Kind::Vector(v) => v,
            _ => {
                return Err(Error::TypeMismatch {
                    expected: "vector",
                    found: self.type_name(),
                })
            }
        };
        vec.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: vec.len(),
        })
    }

    pub fn push_back(&mut self, item: Value) {
        if let Kind::Vector(v) = &mut self.kind {
            v.push(item);
        }
    }

    /// Assigns `value` into this map under `key`, preserving `value`'s own
    /// comment/position fields exactly as parsed (as opposed to a plain
    /// `insert` that a host API might use to *overwrite* those fields).
    pub fn assign_with_comments(&mut self, key: impl Into<String>, value: Value) {
        if let Kind::Map(m) = &mut self.kind {
            m.insert(key.into(), value);
        }
    }

    /// Indexes a map by key, returning an `Undefined` placeholder rather
    /// than `None` for a missing key — this is what lets `defined()` drive
    /// the duplicate-key check without a separate `contains_key` call at
    /// every call site.
    pub fn index(&self, key: &str) -> Value {
        match &self.kind {
            Kind::Map(m) => m.get(key).cloned().unwrap_or_else(Value::undefined),
            _ => Value::undefined(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_value_is_undefined() {
        assert!(!Value::undefined().defined());
        assert!(Value::null().defined());
    }

    #[test]
    fn indexing_missing_key_yields_undefined() {
        let m = Value::map();
        assert!(!m.index("missing").defined());
    }

    #[test]
    fn assign_with_comments_preserves_decorations() {
        let mut m = Value::map();
        let mut v = Value::string("hi");
        v.comment_before = "# lead\n".into();
        m.assign_with_comments("k", v);
        let got = m.index("k");
        assert_eq!(got.comment_before, "# lead\n");
        assert_eq!(got.as_str(), Some("hi"));
    }

    #[test]
    fn map_preserves_insertion_order() {
        let mut m = Value::map();
        m.assign_with_comments("b", Value::int64(2));
        m.assign_with_comments("a", Value::int64(1));
        let map = m.as_map().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn typed_accessors_succeed_on_matching_kind() {
        assert_eq!(Value::bool(true).try_bool().unwrap(), true);
        assert_eq!(Value::int64(7).try_int64().unwrap(), 7);
        assert_eq!(Value::string("hi").try_str().unwrap(), "hi");
    }

    #[test]
    fn typed_accessor_reports_type_mismatch() {
        let err = Value::int64(1).try_bool().unwrap_err();
        match err {
            Error::TypeMismatch { expected, found } => {
                assert_eq!(expected, "bool");
                assert_eq!(found, "int64");
            }
            other => panic!("wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn vector_index_out_of_bounds() {
        let mut v = Value::vector();
        v.push_back(Value::int64(1));
        assert_eq!(v.at(0).unwrap().try_int64().unwrap(), 1);
        match v.at(5).unwrap_err() {
            Error::IndexOutOfBounds { index, len } => {
                assert_eq!(index, 5);
                assert_eq!(len, 1);
            }
            other => panic!("wrong error variant: {other:?}"),
        }
    }
}
