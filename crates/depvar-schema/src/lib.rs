//! # depvar-schema — Message Type Declarations & Pattern Tables
//!
//! The schema-side model the runtime validates against. A [`MessageType`]
//! carries its dependency signature, its variants, and an ordered
//! [`PatternTable`] mapping dependency-value patterns to the variant tags
//! legal under them. Tables are validated when they are built — arity
//! mismatches, empty tag sets, and references to undeclared tags are fatal
//! to schema loading, never deferred to matching.
//!
//! ## Responsibilities
//!
//! - **Declarations:** [`MessageType`], [`Variant`], [`FieldDecl`], and the
//!   typed dependency signature, validated at construction time.
//!
//! - **Pattern tables:** ordered `(pattern, tag-set)` entries with explicit
//!   [`PatternSlot::Wildcard`] slots (never a null sentinel), first-match-wins
//!   order preserved from the declaration. An earlier pattern that shadows a
//!   later one is a latent authoring bug and is surfaced as a `tracing`
//!   warning when the table is built.
//!
//! - **Dependency expressions:** [`DepExpr`] trees the front end compiles
//!   for nested dependently-typed fields, evaluated fresh at every
//!   construction by the runtime crate.
//!
//! - **Registry:** [`SchemaRegistry`] — process-wide immutable schema state,
//!   built once from declarations with cross-reference checking, optionally
//!   installed as a process global.
//!
//! Declarations are plain serde data: the front end delivers them as
//! already-type-checked descriptors (JSON/YAML), and deserialization funnels
//! through the same validating constructors as programmatic assembly.

pub mod error;
pub mod expr;
pub mod message;
pub mod pattern;
pub mod registry;

// Re-export primary types.
pub use error::SchemaError;
pub use expr::{BinaryOp, DepExpr, UnaryOp};
pub use message::{DependencyParam, FieldDecl, FieldType, MessageType, ParamType, ScalarType, Variant};
pub use pattern::{DependencyPattern, PatternSlot, PatternTable};
pub use registry::{SchemaDescriptor, SchemaRegistry, SchemaRegistryBuilder};
