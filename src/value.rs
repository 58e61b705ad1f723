// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! JSON-shaped values stored in template nodes.

use std::fmt;

use hashlink::LinkedHashMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{node::Node, render::to_canonical_json};

/// An insertion-ordered map of plain values.
pub type Map = LinkedHashMap<String, Value>;

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Value>),
    Map(Map),
    Node(Node),
}

/// Builds a `Vec<Value>` from heterogeneous expressions.
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` in a map or node value.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(key).cloned(),
            Value::Node(node) => node.get(key),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Map(left), Value::Map(right)) => left == right,
            (Value::Node(left), Value::Node(right)) => left == right,
            // A node compares equal to the plain map it would render as.
            (Value::Node(node), Value::Map(map)) | (Value::Map(map), Value::Node(node)) => node.entries_eq(map),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Number(value) => value.serialize(serializer),
            Value::String(value) => serializer.serialize_str(value),
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = to_canonical_json(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Value {
        Value::String(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
    $(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Value {
                Value::Number(value.into())
            }
        }
    )*
    }
}

from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        // JSON has no NaN or infinity.
        match serde_json::Number::from_f64(value) {
            Some(number) => Value::Number(number),
            None => Value::Null,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Value {
        Value::Node(node)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Value {
        Value::Node(node.clone())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Value {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Value {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(value),
            serde_json::Value::Number(value) => Value::Number(value),
            serde_json::Value::String(value) => Value::String(value),
            serde_json::Value::Array(values) => Value::List(values.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(entries) => {
                let map = entries.into_iter().map(|(key, value)| (key, Value::from(value))).collect();
                Value::Map(map)
            }
        }
    }
}
