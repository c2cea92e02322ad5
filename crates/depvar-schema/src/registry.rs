//! # The Schema Registry
//!
//! Process-wide immutable schema state. A [`SchemaRegistryBuilder`] collects
//! validated [`MessageType`] declarations, and `finish()` checks every
//! cross-type reference — dependency parameters, message-typed fields,
//! constructed literals in expressions, and instance literals inside pattern
//! slots — before producing a [`SchemaRegistry`]. After that the registry is
//! never mutated; message types are shared via `Arc`.
//!
//! A registry can optionally be installed as the process global with
//! [`install`], mirroring the load-once-at-startup lifecycle: initialized
//! during schema load, dropped at process teardown, never replaced.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use depvar_core::{Instance, Value};

use crate::error::SchemaError;
use crate::expr::DepExpr;
use crate::message::{FieldType, MessageType, ParamType};
use crate::pattern::PatternSlot;

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// An immutable collection of cross-checked message type declarations.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: BTreeMap<String, Arc<MessageType>>,
}

impl SchemaRegistry {
    /// Start building a registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            types: BTreeMap::new(),
        }
    }

    /// Look up a message type by name.
    pub fn get(&self, name: &str) -> Option<&Arc<MessageType>> {
        self.types.get(name)
    }

    /// Whether a message type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered message types, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MessageType>> {
        self.types.values()
    }

    /// Number of registered message types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistryBuilder
// ---------------------------------------------------------------------------

/// Collects declarations, then cross-checks them into a [`SchemaRegistry`].
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    types: BTreeMap<String, Arc<MessageType>>,
}

impl SchemaRegistryBuilder {
    /// Register one declaration.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateMessage`] if the name is already taken.
    pub fn register(&mut self, message: MessageType) -> Result<&mut Self, SchemaError> {
        let name = message.name().to_string();
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateMessage(name));
        }
        self.types.insert(name, Arc::new(message));
        Ok(self)
    }

    /// Cross-check every reference and produce the immutable registry.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownMessage`] for dangling type references,
    /// [`SchemaError::UnknownConstructTag`] and [`SchemaError::ConstructArity`]
    /// for constructed literals (in expressions or pattern slots) that
    /// disagree with their target's declaration.
    pub fn finish(self) -> Result<SchemaRegistry, SchemaError> {
        let registry = SchemaRegistry { types: self.types };

        for message in registry.iter() {
            let referrer = message.name();

            for param in message.dependencies() {
                if let ParamType::Message {
                    message: target,
                    dependencies,
                } = &param.ty
                {
                    registry.check_known(referrer, target)?;
                    // An empty list means the parameter is accepted as
                    // already validated; a non-empty list must cover the
                    // target's whole signature.
                    if !dependencies.is_empty() {
                        registry.check_derived_arity(referrer, target, dependencies.len())?;
                    }
                    for expr in dependencies {
                        registry.check_expr(referrer, expr)?;
                    }
                }
            }

            for variant in message.variants() {
                for field in &variant.fields {
                    if let FieldType::Message {
                        message: target,
                        dependencies,
                    } = &field.ty
                    {
                        registry.check_known(referrer, target)?;
                        registry.check_derived_arity(referrer, target, dependencies.len())?;
                        for expr in dependencies {
                            registry.check_expr(referrer, expr)?;
                        }
                    }
                }
            }

            for entry in message.table().entries() {
                for slot in &entry.slots {
                    if let PatternSlot::Exact(value) = slot {
                        registry.check_value(referrer, value)?;
                    }
                }
            }
        }

        tracing::debug!(types = registry.len(), "schema registry loaded");
        Ok(registry)
    }
}

impl SchemaRegistry {
    fn check_known(&self, referrer: &str, target: &str) -> Result<(), SchemaError> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(SchemaError::UnknownMessage {
                referrer: referrer.to_string(),
                target: target.to_string(),
            })
        }
    }

    fn check_derived_arity(
        &self,
        referrer: &str,
        target: &str,
        found: usize,
    ) -> Result<(), SchemaError> {
        let Some(declared) = self.get(target) else {
            return Err(SchemaError::UnknownMessage {
                referrer: referrer.to_string(),
                target: target.to_string(),
            });
        };
        if declared.arity() != found {
            return Err(SchemaError::DerivedArity {
                referrer: referrer.to_string(),
                target: target.to_string(),
                expected: declared.arity(),
                found,
            });
        }
        Ok(())
    }

    /// Check every constructed literal inside an expression tree.
    fn check_expr(&self, referrer: &str, expr: &DepExpr) -> Result<(), SchemaError> {
        let mut result = Ok(());
        expr.walk(&mut |node| {
            if result.is_err() {
                return;
            }
            if let DepExpr::Construct {
                message,
                tag,
                fields,
            } = node
            {
                result = self.check_construct(referrer, message, tag, fields.len());
            }
        });
        result
    }

    /// Check an instance literal (from a pattern slot), recursively.
    fn check_value(&self, referrer: &str, value: &Value) -> Result<(), SchemaError> {
        if let Value::Message(instance) = value {
            self.check_instance(referrer, instance)?;
        }
        Ok(())
    }

    fn check_instance(&self, referrer: &str, instance: &Instance) -> Result<(), SchemaError> {
        self.check_construct(
            referrer,
            instance.message(),
            instance.tag(),
            instance.fields().len(),
        )?;
        for field in instance.fields() {
            self.check_value(referrer, field)?;
        }
        Ok(())
    }

    fn check_construct(
        &self,
        referrer: &str,
        target: &str,
        tag: &depvar_core::VariantTag,
        found: usize,
    ) -> Result<(), SchemaError> {
        let Some(declared) = self.get(target) else {
            return Err(SchemaError::UnknownMessage {
                referrer: referrer.to_string(),
                target: target.to_string(),
            });
        };
        let Some(variant) = declared.variant(tag.as_str()) else {
            return Err(SchemaError::UnknownConstructTag {
                referrer: referrer.to_string(),
                target: target.to_string(),
                tag: tag.clone(),
            });
        };
        if variant.fields.len() != found {
            return Err(SchemaError::ConstructArity {
                referrer: referrer.to_string(),
                target: target.to_string(),
                tag: variant.tag.clone(),
                expected: variant.fields.len(),
                found,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// The wire form of a whole schema: the declarations the front end emits,
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Message type declarations.
    pub messages: Vec<MessageType>,
}

impl SchemaDescriptor {
    /// Build a cross-checked registry from the descriptor.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] from registration or cross-checking.
    pub fn into_registry(self) -> Result<SchemaRegistry, SchemaError> {
        let mut builder = SchemaRegistry::builder();
        for message in self.messages {
            builder.register(message)?;
        }
        builder.finish()
    }
}

// ---------------------------------------------------------------------------
// Process global
// ---------------------------------------------------------------------------

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Install a registry as the process global.
///
/// # Errors
///
/// [`SchemaError::AlreadyInstalled`] if a registry was installed before.
pub fn install(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, SchemaError> {
    let mut fresh = false;
    let installed = GLOBAL.get_or_init(|| {
        fresh = true;
        registry
    });
    if fresh {
        Ok(installed)
    } else {
        Err(SchemaError::AlreadyInstalled)
    }
}

/// The process-global registry, if one was installed.
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL.get()
}
