//! # The Closed Value Model
//!
//! [`Value`] is the single runtime representation for everything a
//! dependency tuple, a pattern slot, or a message field can hold: the five
//! primitive domains plus constructed variant instances. Keeping the enum
//! closed means every consumer matches exhaustively — adding a sixth
//! primitive is a compile error at every match site until it is handled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeMismatch;
use crate::instance::Instance;

/// A runtime value: a primitive or a constructed variant instance.
///
/// Signed (`Int`) and unsigned (`Uint`) integers are distinct kinds — the
/// schema front end keeps them apart, and so does structural equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Unsigned 64-bit integer.
    Uint(u64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
    /// IEEE-754 double. Equality is IEEE equality (`NaN != NaN`).
    Float(f64),
    /// A constructed variant instance of some message type.
    Message(Instance),
}

impl Value {
    /// Human-readable kind name, used in error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "unsigned",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Float(_) => "float",
            Self::Message(_) => "message",
        }
    }

    /// Structural equality — the sole comparison primitive pattern matching
    /// relies on.
    ///
    /// Primitive equality is value equality. Instance equality requires the
    /// same message type, the same tag, and recursively equal fields in
    /// declaration order; bound dependency values do not participate.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] when the two values are of different shapes —
    /// mismatched primitive kinds, a primitive against an instance, or
    /// instances of different message types. This is a usage error rejected
    /// at the boundary, not a `false` answer.
    pub fn structural_eq(&self, other: &Self) -> Result<bool, TypeMismatch> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(a == b),
            (Self::Uint(a), Self::Uint(b)) => Ok(a == b),
            (Self::Bool(a), Self::Bool(b)) => Ok(a == b),
            (Self::Str(a), Self::Str(b)) => Ok(a == b),
            (Self::Float(a), Self::Float(b)) => Ok(a == b),
            (Self::Message(a), Self::Message(b)) => a.structural_eq(b),
            (a, b) => Err(TypeMismatch::Kind {
                left: a.kind(),
                right: b.kind(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Message(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Message(v)
    }
}


#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::instance::VariantTag;

    /// Values up to three levels of nesting. Floats are kept finite so that
    /// reflexivity holds (IEEE `NaN != NaN` is exercised by a unit test).
    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::Int),
            any::<u64>().prop_map(Value::Uint),
            any::<bool>().prop_map(Value::Bool),
            "[a-z]{0,8}".prop_map(Value::Str),
            (-1.0e9f64..1.0e9).prop_map(Value::Float),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            (prop::collection::vec(inner, 0..4), "[A-Z][a-z]{1,6}").prop_map(|(fields, tag)| {
                Value::Message(
                    Instance::literal("Generated", VariantTag::new(tag).unwrap(), fields).unwrap(),
                )
            })
        })
    }

    proptest! {
        #[test]
        fn structural_eq_is_reflexive(v in value_strategy()) {
            prop_assert!(v.structural_eq(&v).unwrap());
        }

        #[test]
        fn structural_eq_is_symmetric(a in value_strategy(), b in value_strategy()) {
            match (a.structural_eq(&b), b.structural_eq(&a)) {
                (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "comparison errored in only one direction"),
            }
        }

        #[test]
        fn serde_roundtrips(v in value_strategy()) {
            let json = serde_json::to_string(&v).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            prop_assert!(v.structural_eq(&back).unwrap());
        }
    }
}
