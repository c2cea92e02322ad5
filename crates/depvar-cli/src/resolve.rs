//! # `depvar resolve`
//!
//! Prints the set of variant tags legal for a dependency tuple — the
//! introspection face of the resolver. An empty set is a successful answer:
//! it means no pattern in the table admits the tuple.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use depvar_core::{Value, VariantTag};
use depvar_runtime::Validator;

use crate::descriptor;

/// Arguments for `depvar resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Schema descriptor file (JSON or YAML).
    pub schema: PathBuf,

    /// Message type to resolve against.
    #[arg(long)]
    pub message: String,

    /// Dependency tuple as a JSON array of values,
    /// e.g. '[{"str": "red"}]'.
    #[arg(long)]
    pub deps: String,
}

/// Resolve and print the legal tag set.
pub fn run_resolve(args: &ResolveArgs) -> anyhow::Result<u8> {
    let registry = descriptor::load_registry(&args.schema)?;
    let dependencies: Vec<Value> = serde_json::from_str(&args.deps)
        .context("cannot parse --deps as a JSON array of values")?;

    let legal = Validator::new(&registry)
        .resolve(&args.message, &dependencies)
        .with_context(|| format!("resolution failed for message type `{}`", args.message))?;

    if legal.is_empty() {
        println!("{}: no variant is legal for the given dependencies", args.message);
    } else {
        let tags = legal
            .iter()
            .map(VariantTag::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {{{tags}}}", args.message);
    }
    Ok(0)
}
