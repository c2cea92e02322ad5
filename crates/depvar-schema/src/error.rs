//! # Schema-Loading Errors
//!
//! Every variant here is fatal to schema loading: a declaration that fails
//! these checks never becomes a usable [`MessageType`](crate::MessageType)
//! or [`SchemaRegistry`](crate::SchemaRegistry). Nothing in this module is a
//! per-call runtime concern.

use depvar_core::VariantTag;
use thiserror::Error;

/// A schema declaration failed construction-time validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Message type name was empty.
    #[error("message type name must be a non-empty string")]
    EmptyMessageName,

    /// A dependency parameter name was empty.
    #[error("message type `{message}` declares a dependency parameter with an empty name")]
    EmptyParamName {
        /// The declaring message type.
        message: String,
    },

    /// A field name was empty.
    #[error("variant `{tag}` of message type `{message}` declares a field with an empty name")]
    EmptyFieldName {
        /// The declaring message type.
        message: String,
        /// The declaring variant.
        tag: VariantTag,
    },

    /// A message type declared no variants at all.
    #[error("message type `{message}` declares no variants")]
    NoVariants {
        /// The offending message type.
        message: String,
    },

    /// Two variants of one message type share a tag.
    #[error("duplicate variant tag `{tag}` in message type `{message}`")]
    DuplicateTag {
        /// The declaring message type.
        message: String,
        /// The repeated tag.
        tag: VariantTag,
    },

    /// A pattern's slot count disagrees with the dependency signature.
    #[error(
        "pattern {index} of message type `{message}` has {found} slots, \
         but the dependency signature has arity {expected}"
    )]
    PatternArity {
        /// The declaring message type.
        message: String,
        /// Zero-based position of the pattern in declaration order.
        index: usize,
        /// Signature arity.
        expected: usize,
        /// Slots the pattern actually has.
        found: usize,
    },

    /// A pattern carries an empty tag set.
    #[error("pattern {index} of message type `{message}` has an empty tag set")]
    EmptyTagSet {
        /// The declaring message type.
        message: String,
        /// Zero-based position of the pattern in declaration order.
        index: usize,
    },

    /// A pattern names a tag no variant of the message type carries.
    #[error("pattern {index} of message type `{message}` names undeclared tag `{tag}`")]
    UnknownTag {
        /// The declaring message type.
        message: String,
        /// Zero-based position of the pattern in declaration order.
        index: usize,
        /// The undeclared tag.
        tag: VariantTag,
    },

    /// Two message types with the same name were registered.
    #[error("duplicate message type `{0}` in schema registry")]
    DuplicateMessage(String),

    /// A declaration references a message type the registry does not hold.
    #[error("`{referrer}` references unknown message type `{target}`")]
    UnknownMessage {
        /// The referring message type.
        referrer: String,
        /// The dangling reference.
        target: String,
    },

    /// A constructed literal names a variant its target type does not declare.
    #[error("`{referrer}` constructs undeclared variant `{tag}` of message type `{target}`")]
    UnknownConstructTag {
        /// The referring message type.
        referrer: String,
        /// The constructed message type.
        target: String,
        /// The undeclared tag.
        tag: VariantTag,
    },

    /// A derived-dependency expression list's length disagrees with the
    /// arity of the message type it parameterizes.
    #[error(
        "`{referrer}` derives {found} dependency values for `{target}`, \
         which has arity {expected}"
    )]
    DerivedArity {
        /// The referring message type.
        referrer: String,
        /// The parameterized message type.
        target: String,
        /// The target's signature arity.
        expected: usize,
        /// Expressions actually declared.
        found: usize,
    },

    /// A constructed literal's field count disagrees with the declaration.
    #[error(
        "`{referrer}` constructs `{target}` variant `{tag}` with {found} fields, \
         but the declaration has {expected}"
    )]
    ConstructArity {
        /// The referring message type.
        referrer: String,
        /// The constructed message type.
        target: String,
        /// The constructed variant.
        tag: VariantTag,
        /// Declared field count.
        expected: usize,
        /// Fields the literal actually has.
        found: usize,
    },

    /// A schema registry was already installed as the process global.
    #[error("a schema registry is already installed for this process")]
    AlreadyInstalled,
}
