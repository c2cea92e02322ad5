//! # depvar-core — Value Model & Structural Equality
//!
//! Foundational types shared by every depvar crate: the closed [`Value`]
//! enum over the five primitive domains and constructed instances, the
//! validated [`VariantTag`] newtype, and [`Instance`] — a constructed
//! variant value bound to the dependency values that were active when it
//! was built.
//!
//! ## Structural Equality
//!
//! Pattern matching relies on exactly one comparison primitive:
//! [`Value::structural_eq`]. Two instances are equal when their message
//! type, variant tag, and fields (recursively) agree — bound dependency
//! values are construction context, not identity. Comparing values of
//! mismatched shape (an `int` against a `bool`, an instance against a
//! primitive, instances of different message types) is a usage error
//! surfaced as a [`TypeMismatch`], never a silent `false`.

pub mod error;
pub mod instance;
pub mod value;

// Re-export primary types.
pub use error::{EmptyIdentifier, TypeMismatch};
pub use instance::{Instance, VariantTag};
pub use value::Value;
