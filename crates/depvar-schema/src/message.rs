//! # Message Type Declarations
//!
//! [`MessageType`] is the static description the front end emits per message
//! type: a typed dependency signature, the declared variants with their
//! fields, and the pattern table constraining which variants are legal for
//! which dependency values. Declarations are immutable after construction
//! and shared via `Arc` once registered.
//!
//! Deserialization funnels through [`MessageType::new`], so a descriptor
//! that would not pass programmatic validation does not deserialize either.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use depvar_core::{Value, VariantTag};

use crate::error::SchemaError;
use crate::expr::DepExpr;
use crate::pattern::{DependencyPattern, PatternTable};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The five primitive domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Str,
    /// IEEE-754 double.
    Float,
}

impl ScalarType {
    /// Whether a runtime value inhabits this domain.
    pub fn admits(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Int, Value::Int(_))
                | (Self::Uint, Value::Uint(_))
                | (Self::Bool, Value::Bool(_))
                | (Self::Str, Value::Str(_))
                | (Self::Float, Value::Float(_))
        )
    }

    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uint => "unsigned",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Float => "float",
        }
    }
}

/// The type of one dependency parameter slot.
///
/// Signatures are telescopes: a message-typed parameter may carry derived
/// dependency expressions over the parameters declared before it, and the
/// supplied instance is checked against that derived tuple when a
/// construction binds the signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// A primitive domain.
    Scalar(ScalarType),
    /// An instance of another message type.
    Message {
        /// The referenced message type.
        message: String,
        /// Derived-dependency expressions over the preceding parameters,
        /// aligned with the referenced type's signature. Empty means the
        /// parameter is accepted as already validated.
        #[serde(default)]
        dependencies: Vec<DepExpr>,
    },
}

impl ParamType {
    /// A message-typed parameter with no derived constraints.
    pub fn message(name: impl Into<String>) -> Self {
        Self::Message {
            message: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Whether a runtime value inhabits this slot type.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Scalar(scalar), value) => scalar.admits(value),
            (Self::Message { message, .. }, Value::Message(instance)) => {
                instance.message() == message
            }
            (Self::Message { .. }, _) => false,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.name().to_string(),
            Self::Message { message, .. } => format!("message `{message}`"),
        }
    }
}

/// The type of one declared field.
///
/// A message-typed field carries the derived-dependency expressions that
/// parameterize its validation: one expression per slot of the nested
/// type's dependency signature, evaluated in the enclosing instance's scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A primitive domain.
    Scalar(ScalarType),
    /// A nested dependently-typed field.
    Message {
        /// The nested message type.
        message: String,
        /// Derived-dependency expressions, aligned with the nested type's
        /// dependency signature.
        #[serde(default)]
        dependencies: Vec<DepExpr>,
    },
}

impl FieldType {
    /// A message-typed field with its derived-dependency expressions.
    pub fn message(name: impl Into<String>, dependencies: Vec<DepExpr>) -> Self {
        Self::Message {
            message: name.into(),
            dependencies,
        }
    }

    /// Whether a runtime value inhabits this field type. For message-typed
    /// fields this checks the instance's message type name only — variant
    /// legality is the runtime's job.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Scalar(scalar), value) => scalar.admits(value),
            (Self::Message { message, .. }, Value::Message(instance)) => {
                instance.message() == message
            }
            (Self::Message { .. }, _) => false,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.name().to_string(),
            Self::Message { message, .. } => format!("message `{message}`"),
        }
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// One slot of a dependency signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyParam {
    /// Parameter name, referenced by derived-dependency expressions.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl DependencyParam {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One declared field of a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name, referenced by derived-dependency expressions.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldDecl {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One declared variant: a tag plus ordered typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// The variant's tag, unique within its message type.
    pub tag: VariantTag,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl Variant {
    /// Convenience constructor.
    pub fn new(tag: VariantTag, fields: Vec<FieldDecl>) -> Self {
        Self { tag, fields }
    }
}

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// A complete, validated message type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMessageType")]
pub struct MessageType {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<DependencyParam>,
    variants: Vec<Variant>,
    #[serde(rename = "patterns")]
    table: PatternTable,
}

impl MessageType {
    /// Validate and build a message type declaration.
    ///
    /// # Errors
    ///
    /// All [`SchemaError`] variants concerning a single declaration: empty
    /// names, zero variants, duplicate tags, and every pattern-table defect
    /// (arity, empty tag sets, undeclared tags). Cross-type references are
    /// checked later, when a registry is finished.
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<DependencyParam>,
        variants: Vec<Variant>,
        patterns: Vec<DependencyPattern>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyMessageName);
        }
        for param in &dependencies {
            if param.name.trim().is_empty() {
                return Err(SchemaError::EmptyParamName {
                    message: name.clone(),
                });
            }
        }
        if variants.is_empty() {
            return Err(SchemaError::NoVariants { message: name });
        }

        let mut declared_tags = BTreeSet::new();
        for variant in &variants {
            if !declared_tags.insert(variant.tag.clone()) {
                return Err(SchemaError::DuplicateTag {
                    message: name,
                    tag: variant.tag.clone(),
                });
            }
            for field in &variant.fields {
                if field.name.trim().is_empty() {
                    return Err(SchemaError::EmptyFieldName {
                        message: name,
                        tag: variant.tag.clone(),
                    });
                }
            }
        }

        let table = PatternTable::build(&name, dependencies.len(), &declared_tags, patterns)?;

        Ok(Self {
            name,
            dependencies,
            variants,
            table,
        })
    }

    /// The message type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dependency signature in declaration order.
    pub fn dependencies(&self) -> &[DependencyParam] {
        &self.dependencies
    }

    /// Signature arity.
    pub fn arity(&self) -> usize {
        self.dependencies.len()
    }

    /// Declared variants in declaration order.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Look up a variant by tag.
    pub fn variant(&self, tag: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.tag.as_str() == tag)
    }

    /// The tags of every declared variant.
    pub fn declared_tags(&self) -> BTreeSet<VariantTag> {
        self.variants.iter().map(|v| v.tag.clone()).collect()
    }

    /// The validated pattern table.
    pub fn table(&self) -> &PatternTable {
        &self.table
    }
}

/// Unvalidated wire shape; [`MessageType`] deserializes through it.
#[derive(Deserialize)]
struct RawMessageType {
    name: String,
    #[serde(default)]
    dependencies: Vec<DependencyParam>,
    variants: Vec<Variant>,
    #[serde(default)]
    patterns: Vec<DependencyPattern>,
}

impl TryFrom<RawMessageType> for MessageType {
    type Error = SchemaError;

    fn try_from(raw: RawMessageType) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.dependencies, raw.variants, raw.patterns)
    }
}
