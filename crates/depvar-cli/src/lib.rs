//! # depvar-cli — Schema Descriptor Tooling
//!
//! Subcommand implementations for the `depvar` binary. Each module exposes
//! an args struct and a `run_*` function returning the process exit code;
//! `main.rs` owns argument parsing and tracing initialization.
//!
//! Descriptor files are the front end's output: JSON or YAML (picked by
//! file extension), deserialized through the same validating constructors
//! the library uses, so a descriptor that loads is a descriptor that passed
//! schema validation.

pub mod check;
pub mod descriptor;
pub mod inspect;
pub mod resolve;
