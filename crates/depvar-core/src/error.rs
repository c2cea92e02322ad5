//! # Boundary Errors
//!
//! Errors raised by the value model itself. Shape-mismatched comparisons
//! are rejected here rather than answered with `false`; everything else in
//! the stack builds on that guarantee.

use thiserror::Error;

/// A structural comparison was attempted between values of mismatched shape.
///
/// Well-typed schemas never produce these: the front end guarantees that
/// pattern slots and actual dependency values agree in kind. Hitting one of
/// these variants at runtime therefore denotes a schema-authoring defect and
/// is surfaced to the caller unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeMismatch {
    /// Two primitives (or a primitive and an instance) of different kinds.
    #[error("cannot compare {left} with {right}")]
    Kind {
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// Two instances of different message types.
    #[error("cannot compare instances of `{left}` and `{right}`")]
    Message {
        /// Message type of the left instance.
        left: String,
        /// Message type of the right instance.
        right: String,
    },

    /// Two instances of the same message type and tag carrying different
    /// field counts. Validated instances cannot disagree here; a malformed
    /// hand-built literal can.
    #[error(
        "instances of `{message}` variant `{tag}` carry {left} and {right} fields"
    )]
    FieldArity {
        /// The shared message type.
        message: String,
        /// The shared variant tag.
        tag: String,
        /// Field count of the left instance.
        left: usize,
        /// Field count of the right instance.
        right: usize,
    },
}

/// An identifier (message type name or variant tag) was empty.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("identifier must be a non-empty string")]
pub struct EmptyIdentifier;
