//! # `depvar check`
//!
//! Validates an instance descriptor against its schema: tag membership
//! under the instance's bound dependency tuple, field shapes, and the full
//! derived-dependency chain for nested fields. A validation failure is the
//! command's negative answer (exit code 1), not a crash.

use std::path::PathBuf;

use clap::Args;

use depvar_runtime::Validator;

use crate::descriptor;

/// Arguments for `depvar check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema descriptor file (JSON or YAML).
    pub schema: PathBuf,

    /// Instance descriptor file (JSON or YAML).
    #[arg(long)]
    pub instance: PathBuf,
}

/// Check one instance descriptor; exit 0 when valid, 1 when rejected.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<u8> {
    let registry = descriptor::load_registry(&args.schema)?;
    let instance = descriptor::load_instance(&args.instance)?;

    let validator = Validator::new(&registry);
    match validator.check(&instance, instance.dependencies()) {
        Ok(()) => {
            println!("{}::{instance}: valid", instance.message());
            Ok(0)
        }
        Err(err) => {
            println!("{}::{instance}: invalid ({err})", instance.message());
            Ok(1)
        }
    }
}
