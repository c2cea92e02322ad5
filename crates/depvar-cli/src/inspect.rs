//! # `depvar inspect`
//!
//! Loads a schema descriptor and prints every message type: signature,
//! variants, and the pattern table in declaration order. Unreachable-pattern
//! warnings fire during loading, so inspecting a descriptor also audits it.

use std::path::PathBuf;

use clap::Args;

use depvar_schema::{FieldType, MessageType, PatternSlot};

use crate::descriptor;

/// Arguments for `depvar inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Schema descriptor file (JSON or YAML).
    pub schema: PathBuf,
}

/// List every message type in the descriptor.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<u8> {
    let registry = descriptor::load_registry(&args.schema)?;
    for message in registry.iter() {
        print_message(message);
    }
    Ok(0)
}

fn print_message(message: &MessageType) {
    println!("{} (arity {})", message.name(), message.arity());
    if !message.dependencies().is_empty() {
        let signature = message
            .dependencies()
            .iter()
            .map(|param| format!("{}: {}", param.name, param.ty.describe()))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  dependencies: {signature}");
    }
    for variant in message.variants() {
        let fields = variant
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, describe_field(&field.ty)))
            .collect::<Vec<_>>()
            .join(", ");
        if fields.is_empty() {
            println!("  variant {}", variant.tag);
        } else {
            println!("  variant {}({fields})", variant.tag);
        }
    }
    if message.table().is_empty() {
        println!("  patterns: (unconstrained)");
    } else {
        for entry in message.table().entries() {
            let slots = entry
                .slots
                .iter()
                .map(|slot| match slot {
                    PatternSlot::Wildcard => "_".to_string(),
                    PatternSlot::Exact(value) => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            let tags = entry
                .tags
                .iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  pattern ({slots}) -> {{{tags}}}");
        }
    }
}

fn describe_field(ty: &FieldType) -> String {
    match ty {
        FieldType::Scalar(_) => ty.describe(),
        FieldType::Message {
            message,
            dependencies,
        } => {
            if dependencies.is_empty() {
                message.clone()
            } else {
                let derived = dependencies
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{message}<{derived}>")
            }
        }
    }
}
