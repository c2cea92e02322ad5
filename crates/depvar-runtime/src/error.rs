//! # Validation Errors
//!
//! Per-call failures. Everything here is reported to the immediate caller
//! and never retried or recovered internally: a validation failure means the
//! caller's invariant assumption was wrong, and nested failures propagate
//! upward without wrapping so the original cause stays visible.

use depvar_core::{EmptyIdentifier, TypeMismatch, VariantTag};
use thiserror::Error;

/// A derived-dependency expression could not be evaluated.
///
/// The front end type-checks expressions, and an enclosing type's own
/// validated constraints bound the field values they see — so any of these
/// at runtime denotes a schema-authoring inconsistency. They are surfaced,
/// never silently defaulted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    /// A variable names neither a dependency parameter nor a field of the
    /// enclosing instance.
    #[error("unbound name `{0}` in dependency expression")]
    Unbound(String),

    /// A binary operator applied to operands it is not defined for.
    #[error("`{op}` is not defined for {left} and {right}")]
    Type {
        /// The operator's surface syntax.
        op: &'static str,
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// A unary operator or boolean connective applied to the wrong kind.
    #[error("`{op}` is not defined for operand of kind {found}")]
    Operand {
        /// The operator's surface syntax.
        op: &'static str,
        /// Kind of the offending operand.
        found: &'static str,
    },

    /// Checked integer arithmetic overflowed (or underflowed).
    #[error("integer overflow evaluating `{op}`")]
    Overflow {
        /// The operator's surface syntax.
        op: &'static str,
    },

    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A constructed literal carried an empty message type name.
    #[error(transparent)]
    Literal(#[from] EmptyIdentifier),
}

/// A construction or resolution call failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The named message type is not in the registry.
    #[error("unknown message type `{0}`")]
    UnknownMessage(String),

    /// The message type declares no variant with the requested tag.
    #[error("message type `{message}` declares no variant `{tag}`")]
    UnknownVariant {
        /// The message type consulted.
        message: String,
        /// The undeclared tag.
        tag: String,
    },

    /// The supplied dependency tuple's length disagrees with the signature.
    #[error("message type `{message}` takes {expected} dependency values, got {found}")]
    DependencyArity {
        /// The message type consulted.
        message: String,
        /// Signature arity.
        expected: usize,
        /// Values actually supplied.
        found: usize,
    },

    /// A supplied dependency value does not inhabit its declared slot type.
    #[error(
        "dependency `{name}` of message type `{message}` expects {expected}, got {found}"
    )]
    DependencyShape {
        /// The message type consulted.
        message: String,
        /// The parameter name.
        name: String,
        /// The declared slot type.
        expected: String,
        /// Kind of the supplied value.
        found: &'static str,
    },

    /// The supplied field count disagrees with the variant declaration.
    #[error("variant `{tag}` of message type `{message}` takes {expected} fields, got {found}")]
    FieldCount {
        /// The message type consulted.
        message: String,
        /// The variant.
        tag: VariantTag,
        /// Declared field count.
        expected: usize,
        /// Fields actually supplied.
        found: usize,
    },

    /// A supplied field value does not inhabit its declared type.
    #[error("field `{name}` of `{message}::{tag}` expects {expected}, got {found}")]
    FieldShape {
        /// The message type consulted.
        message: String,
        /// The variant.
        tag: VariantTag,
        /// The field name.
        name: String,
        /// The declared field type.
        expected: String,
        /// Kind of the supplied value.
        found: &'static str,
    },

    /// The constructed tag is not in the legal set resolved for the supplied
    /// dependency values.
    #[error("variant `{tag}` of message type `{message}` does not match the given dependencies")]
    VariantMismatch {
        /// The message type consulted.
        message: String,
        /// The rejected tag.
        tag: VariantTag,
    },

    /// A structural comparison between a pattern slot and an actual value
    /// hit mismatched shapes (schema-authoring defect).
    #[error(transparent)]
    Type(#[from] TypeMismatch),

    /// A derived-dependency expression failed to evaluate.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// An instance carried an empty message type name.
    #[error(transparent)]
    Identifier(#[from] EmptyIdentifier),
}
