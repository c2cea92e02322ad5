//! # depvar-runtime — Resolution, Construction, Validation
//!
//! The per-construction half of the depvar stack. Given an immutable
//! [`SchemaRegistry`](depvar_schema::SchemaRegistry), a [`Validator`]
//! answers three questions:
//!
//! - [`Validator::resolve`] — which variant tags are legal for an actual
//!   dependency tuple? First consistent pattern wins; no match means the
//!   empty set.
//! - [`Validator::construct`] — build an instance and validate it, failing
//!   with [`ValidationError::VariantMismatch`] when the requested tag is not
//!   in the resolved set.
//! - [`Validator::check`] — validate an existing instance against a
//!   dependency tuple, re-deriving and re-checking nested dependently-typed
//!   fields under that tuple.
//!
//! Construction is two-phase: an instance's own fields are supplied
//! bottom-up first, then the derived-dependency expressions for its nested
//! fields are evaluated against those fields (and the supplied tuple) and
//! the nested checks run recursively. Failures deep in a dependency chain
//! propagate to the caller unmodified.
//!
//! Everything here is a pure, synchronous function over immutable inputs:
//! no I/O, no locking, no caching of derived tuples.

pub mod error;
pub mod eval;
pub mod validator;

// Re-export primary types.
pub use error::{ExpressionError, ValidationError};
pub use eval::{eval, Scope};
pub use validator::Validator;
