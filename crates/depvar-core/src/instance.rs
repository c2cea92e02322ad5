//! # Variant Tags & Constructed Instances
//!
//! An [`Instance`] is a constructed variant value: the message type it
//! belongs to, the variant tag that was constructed, the field values in
//! declaration order, and the dependency values that were active at
//! construction time. Instances are immutable once built.
//!
//! ## Identity
//!
//! Equality is structural over (message type, tag, fields). The bound
//! dependency tuple is retained so enclosing constructions can re-derive and
//! re-check nested constraints, but it is construction *context* — two
//! instances built under different dependency values with the same tag and
//! fields compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EmptyIdentifier, TypeMismatch};
use crate::value::Value;

// -- Validating Deserialize for VariantTag ------------------------------------

impl<'de> Deserialize<'de> for VariantTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A variant tag, unique within its message type (e.g. `Red`, `DefaultHouse`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VariantTag(String);

impl VariantTag {
    /// Create a variant tag, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if the string is empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdentifier> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyIdentifier);
        }
        Ok(Self(value))
    }

    /// Access the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A constructed variant value bound to its construction-time dependencies.
///
/// Normally produced by the runtime's `construct` operation, which validates
/// the tag against the message type's pattern table first. [`Instance::literal`]
/// builds an unvalidated instance carrying no dependency bindings — the form
/// pattern slots and dependency expressions use as comparison targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    message: String,
    tag: VariantTag,
    #[serde(default)]
    fields: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<Value>,
}

impl Instance {
    /// Create an instance with bound dependency values.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if the message type name is empty.
    pub fn new(
        message: impl Into<String>,
        tag: VariantTag,
        fields: Vec<Value>,
        dependencies: Vec<Value>,
    ) -> Result<Self, EmptyIdentifier> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(EmptyIdentifier);
        }
        Ok(Self {
            message,
            tag,
            fields,
            dependencies,
        })
    }

    /// Create a comparison-target literal: no dependency bindings.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdentifier`] if the message type name is empty.
    pub fn literal(
        message: impl Into<String>,
        tag: VariantTag,
        fields: Vec<Value>,
    ) -> Result<Self, EmptyIdentifier> {
        Self::new(message, tag, fields, Vec::new())
    }

    /// The message type this instance belongs to.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The constructed variant's tag.
    pub fn tag(&self) -> &VariantTag {
        &self.tag
    }

    /// Field values in declaration order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// The dependency values that were active at construction time.
    pub fn dependencies(&self) -> &[Value] {
        &self.dependencies
    }

    /// Structural equality against another instance.
    ///
    /// Equal message type, equal tag, and pointwise structurally equal fields
    /// in declaration order. Bound dependency values do not participate.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch::Message`] when the instances belong to
    /// different message types, and [`TypeMismatch::FieldArity`] when two
    /// same-tag instances disagree on field count (a malformed literal).
    pub fn structural_eq(&self, other: &Self) -> Result<bool, TypeMismatch> {
        if self.message != other.message {
            return Err(TypeMismatch::Message {
                left: self.message.clone(),
                right: other.message.clone(),
            });
        }
        if self.tag != other.tag {
            return Ok(false);
        }
        if self.fields.len() != other.fields.len() {
            return Err(TypeMismatch::FieldArity {
                message: self.message.clone(),
                tag: self.tag.as_str().to_string(),
                left: self.fields.len(),
                right: other.fields.len(),
            });
        }
        for (a, b) in self.fields.iter().zip(&other.fields) {
            if !a.structural_eq(b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// Convenience `==` mirrors structural equality but answers `false` where
// `structural_eq` reports a shape error. Matching code must use
// `structural_eq`; `==` exists for tests and collections.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.tag == other.tag && self.fields == other.fields
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if !self.fields.is_empty() {
            write!(f, "(")?;
            for (i, field) in self.fields.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{field}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
