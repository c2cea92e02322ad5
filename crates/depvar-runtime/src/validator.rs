//! # The Variant Resolver & Constructor/Validator
//!
//! [`Validator`] borrows an immutable [`SchemaRegistry`] and performs the
//! three per-call operations: resolution of the legal tag set, validated
//! construction, and checking of existing instances against dependency
//! tuples. All three are pure; the registry is only read.
//!
//! ## Resolution
//!
//! Patterns are walked in declaration order. The first pattern whose every
//! slot is a wildcard or structurally equal to the corresponding actual
//! value wins — resolution stops there and never unions tag sets across
//! entries. No consistent pattern means the empty set, which construction
//! reports as a variant mismatch. An empty table means the message type is
//! unconstrained: every declared tag is legal.

use std::collections::BTreeSet;

use depvar_core::{Instance, Value, VariantTag};
use depvar_schema::{
    DependencyPattern, FieldType, MessageType, ParamType, SchemaRegistry, Variant,
};

use crate::error::ValidationError;
use crate::eval::{eval, Scope};

/// Pure validation operations over one schema registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    /// Create a validator over a registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The registry this validator reads.
    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Resolve the set of variant tags legal for an actual dependency tuple.
    ///
    /// Exposed for introspection and testing; construction calls it
    /// internally.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownMessage`], tuple arity/shape errors, or a
    /// comparison shape error from a mismatched pattern slot.
    pub fn resolve(
        &self,
        message: &str,
        dependencies: &[Value],
    ) -> Result<BTreeSet<VariantTag>, ValidationError> {
        let decl = self.decl(message)?;
        self.check_dependency_tuple(decl, dependencies)?;
        resolve_decl(decl, dependencies)
    }

    /// Construct and validate an instance.
    ///
    /// Binds `dependencies` and `fields` into an immutable [`Instance`] and
    /// runs the full check: tag membership in the resolved set, then derived
    /// dependency tuples for nested dependently-typed fields, recursively.
    ///
    /// # Errors
    ///
    /// [`ValidationError::VariantMismatch`] when the tag is not legal for
    /// the supplied dependency values; nested failures propagate unmodified.
    pub fn construct(
        &self,
        message: &str,
        tag: &str,
        fields: Vec<Value>,
        dependencies: Vec<Value>,
    ) -> Result<Instance, ValidationError> {
        let decl = self.decl(message)?;
        let variant = decl
            .variant(tag)
            .ok_or_else(|| ValidationError::UnknownVariant {
                message: message.to_string(),
                tag: tag.to_string(),
            })?;
        let instance = Instance::new(decl.name(), variant.tag.clone(), fields, dependencies)?;
        self.check(&instance, instance.dependencies())?;
        Ok(instance)
    }

    /// Validate an existing instance against a dependency tuple.
    ///
    /// This is the primitive enclosing constructions use on their nested
    /// fields: derived tuples are evaluated in the enclosing scope and each
    /// nested instance is checked against its derived tuple. Checking
    /// re-derives the instance's own nested tuples as well, so a chain of
    /// dependent fields is revalidated top-down.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`]; nested failures surface with their original
    /// cause intact.
    pub fn check(
        &self,
        instance: &Instance,
        dependencies: &[Value],
    ) -> Result<(), ValidationError> {
        let decl = self.decl(instance.message())?;
        self.check_dependency_tuple(decl, dependencies)?;

        let variant = decl.variant(instance.tag().as_str()).ok_or_else(|| {
            ValidationError::UnknownVariant {
                message: decl.name().to_string(),
                tag: instance.tag().as_str().to_string(),
            }
        })?;
        self.check_fields(decl, variant, instance.fields())?;

        // Phase one: the instance's own tag against its own tuple.
        let legal = resolve_decl(decl, dependencies)?;
        if !legal.contains(instance.tag()) {
            tracing::debug!(
                message = decl.name(),
                tag = instance.tag().as_str(),
                "variant rejected for supplied dependency values"
            );
            return Err(ValidationError::VariantMismatch {
                message: decl.name().to_string(),
                tag: instance.tag().clone(),
            });
        }

        // Phase two: fields are already bound — derive nested tuples from
        // them (and the supplied tuple) and recurse.
        let scope = Scope::of_instance(decl, variant, instance, dependencies);
        for (field, value) in variant.fields.iter().zip(instance.fields()) {
            if let (FieldType::Message { dependencies: exprs, .. }, Value::Message(nested)) =
                (&field.ty, value)
            {
                let derived = exprs
                    .iter()
                    .map(|expr| eval(expr, &scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.check(nested, &derived)?;
            }
        }
        Ok(())
    }

    fn decl(&self, message: &str) -> Result<&'a MessageType, ValidationError> {
        self.registry
            .get(message)
            .map(|arc| arc.as_ref())
            .ok_or_else(|| ValidationError::UnknownMessage(message.to_string()))
    }

    /// Arity and slot-shape checks for a caller-supplied dependency tuple.
    ///
    /// Signatures are telescopes: a message-typed parameter carrying derived
    /// expressions is checked against the tuple those expressions produce
    /// from the parameters bound before it.
    fn check_dependency_tuple(
        &self,
        decl: &MessageType,
        dependencies: &[Value],
    ) -> Result<(), ValidationError> {
        if dependencies.len() != decl.arity() {
            return Err(ValidationError::DependencyArity {
                message: decl.name().to_string(),
                expected: decl.arity(),
                found: dependencies.len(),
            });
        }
        for (index, (param, value)) in decl.dependencies().iter().zip(dependencies).enumerate() {
            if !param.ty.admits(value) {
                return Err(ValidationError::DependencyShape {
                    message: decl.name().to_string(),
                    name: param.name.clone(),
                    expected: param.ty.describe(),
                    found: value.kind(),
                });
            }
            if let (
                ParamType::Message {
                    dependencies: exprs,
                    ..
                },
                Value::Message(nested),
            ) = (&param.ty, value)
            {
                if exprs.is_empty() {
                    continue;
                }
                let mut scope = Scope::empty();
                for (earlier, bound) in
                    decl.dependencies().iter().zip(dependencies).take(index)
                {
                    scope.bind(&earlier.name, bound);
                }
                let derived = exprs
                    .iter()
                    .map(|expr| eval(expr, &scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.check(nested, &derived)?;
            }
        }
        Ok(())
    }

    fn check_fields(
        &self,
        decl: &MessageType,
        variant: &Variant,
        fields: &[Value],
    ) -> Result<(), ValidationError> {
        if fields.len() != variant.fields.len() {
            return Err(ValidationError::FieldCount {
                message: decl.name().to_string(),
                tag: variant.tag.clone(),
                expected: variant.fields.len(),
                found: fields.len(),
            });
        }
        for (field, value) in variant.fields.iter().zip(fields) {
            if !field.ty.admits(value) {
                return Err(ValidationError::FieldShape {
                    message: decl.name().to_string(),
                    tag: variant.tag.clone(),
                    name: field.name.clone(),
                    expected: field.ty.describe(),
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }
}

/// Walk the table in declaration order; first consistent pattern wins.
fn resolve_decl(
    decl: &MessageType,
    dependencies: &[Value],
) -> Result<BTreeSet<VariantTag>, ValidationError> {
    let table = decl.table();
    if table.is_empty() {
        // Unconstrained message type: every declared variant is legal.
        return Ok(decl.declared_tags());
    }
    for entry in table.entries() {
        if consistent(entry, dependencies)? {
            return Ok(entry.tags.clone());
        }
    }
    Ok(BTreeSet::new())
}

fn consistent(
    pattern: &DependencyPattern,
    actual: &[Value],
) -> Result<bool, ValidationError> {
    for (slot, value) in pattern.slots.iter().zip(actual) {
        if !slot.admits(value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depvar_core::TypeMismatch;
    use depvar_schema::{
        BinaryOp, DepExpr, DependencyParam, FieldDecl, ParamType, PatternSlot, ScalarType,
    };

    fn tag(s: &str) -> VariantTag {
        VariantTag::new(s).unwrap()
    }

    fn tags(set: &BTreeSet<VariantTag>) -> Vec<&str> {
        set.iter().map(VariantTag::as_str).collect()
    }

    /// Scenario fixture: the two-variant color type keyed on a string
    /// dependency, plus a catch-all house type and a derived-dependency
    /// parent/child pair.
    fn registry() -> SchemaRegistry {
        let color = MessageType::new(
            "Color",
            vec![DependencyParam::new("s", ParamType::Scalar(ScalarType::Str))],
            vec![
                Variant::new(
                    tag("Red"),
                    vec![FieldDecl::new("r", FieldType::Scalar(ScalarType::Int))],
                ),
                Variant::new(
                    tag("Green"),
                    vec![FieldDecl::new("g", FieldType::Scalar(ScalarType::Int))],
                ),
            ],
            vec![
                DependencyPattern::new(
                    vec![PatternSlot::Exact(Value::Str("red".into()))],
                    [tag("Red")],
                ),
                DependencyPattern::new(
                    vec![PatternSlot::Exact(Value::Str("green".into()))],
                    [tag("Green")],
                ),
            ],
        )
        .unwrap();

        // Catch-all table: one specific pattern, then a wildcard entry
        // covering two equally-default variants.
        let house = MessageType::new(
            "House",
            vec![
                DependencyParam::new("s", ParamType::Scalar(ScalarType::Str)),
                DependencyParam::new(
                    "col",
                    ParamType::message("Color"),
                ),
            ],
            vec![
                Variant::new(
                    tag("GreenHouse"),
                    vec![FieldDecl::new("address", FieldType::Scalar(ScalarType::Str))],
                ),
                Variant::new(tag("DefaultHouse"), vec![]),
                Variant::new(tag("DefaultHouse2"), vec![]),
            ],
            vec![
                DependencyPattern::new(
                    vec![
                        PatternSlot::Exact(Value::Str("green".into())),
                        PatternSlot::Exact(Value::Message(
                            Instance::literal("Color", tag("Green"), vec![Value::Int(12)])
                                .unwrap(),
                        )),
                    ],
                    [tag("GreenHouse")],
                ),
                DependencyPattern::new(
                    vec![PatternSlot::Wildcard, PatternSlot::Wildcard],
                    [tag("DefaultHouse"), tag("DefaultHouse2")],
                ),
            ],
        )
        .unwrap();

        // Derived-dependency pair: the parent's tuple is (n,), the child's
        // tuple is derived as n - 51.
        let child = MessageType::new(
            "Child",
            vec![DependencyParam::new("m", ParamType::Scalar(ScalarType::Int))],
            vec![Variant::new(tag("Low"), vec![]), Variant::new(tag("High"), vec![])],
            vec![
                DependencyPattern::new(
                    vec![PatternSlot::Exact(Value::Int(-41))],
                    [tag("Low")],
                ),
                DependencyPattern::new(vec![PatternSlot::Wildcard], [tag("High")]),
            ],
        )
        .unwrap();

        let parent = MessageType::new(
            "Parent",
            vec![DependencyParam::new("n", ParamType::Scalar(ScalarType::Int))],
            vec![Variant::new(
                tag("Parent"),
                vec![FieldDecl::new(
                    "child",
                    FieldType::Message {
                        message: "Child".into(),
                        dependencies: vec![DepExpr::binary(
                            BinaryOp::Sub,
                            DepExpr::var("n"),
                            DepExpr::lit(51i64),
                        )],
                    },
                )],
            )],
            vec![],
        )
        .unwrap();

        let mut builder = SchemaRegistry::builder();
        builder.register(color).unwrap();
        builder.register(house).unwrap();
        builder.register(child).unwrap();
        builder.register(parent).unwrap();
        builder.finish().unwrap()
    }

    fn red_dep() -> Vec<Value> {
        vec![Value::Str("red".into())]
    }

    // ── Resolution ───────────────────────────────────────────────────

    #[test]
    fn resolve_returns_first_consistent_pattern() {
        let registry = registry();
        let validator = Validator::new(&registry);

        let legal = validator.resolve("Color", &red_dep()).unwrap();
        assert_eq!(tags(&legal), ["Red"]);

        let legal = validator
            .resolve("Color", &[Value::Str("green".into())])
            .unwrap();
        assert_eq!(tags(&legal), ["Green"]);
    }

    #[test]
    fn resolve_returns_empty_set_when_nothing_matches() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let legal = validator
            .resolve("Color", &[Value::Str("blue".into())])
            .unwrap();
        assert!(legal.is_empty());
    }

    #[test]
    fn resolve_rejects_arity_mismatch() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let err = validator.resolve("Color", &[]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DependencyArity {
                message: "Color".into(),
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn resolve_rejects_shape_mismatch() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let err = validator.resolve("Color", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, ValidationError::DependencyShape { .. }));
    }

    #[test]
    fn resolve_unknown_message_is_an_error() {
        let registry = registry();
        let validator = Validator::new(&registry);
        assert_eq!(
            validator.resolve("Ghost", &[]).unwrap_err(),
            ValidationError::UnknownMessage("Ghost".into())
        );
    }

    #[test]
    fn wildcard_catch_all_covers_two_tags() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let deps = vec![
            Value::Str("anything".into()),
            Value::Message(
                Instance::literal("Color", tag("Red"), vec![Value::Int(7)]).unwrap(),
            ),
        ];
        let legal = validator.resolve("House", &deps).unwrap();
        assert_eq!(tags(&legal), ["DefaultHouse", "DefaultHouse2"]);
    }

    #[test]
    fn structural_instance_slot_matches_first() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let deps = vec![
            Value::Str("green".into()),
            Value::Message(
                Instance::literal("Color", tag("Green"), vec![Value::Int(12)]).unwrap(),
            ),
        ];
        let legal = validator.resolve("House", &deps).unwrap();
        assert_eq!(tags(&legal), ["GreenHouse"]);
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn construct_succeeds_iff_tag_is_resolved() {
        let registry = registry();
        let validator = Validator::new(&registry);

        // Scenario A: Red(5) under ("red",) succeeds.
        let instance = validator
            .construct("Color", "Red", vec![Value::Int(5)], red_dep())
            .unwrap();
        assert_eq!(instance.tag().as_str(), "Red");
        assert_eq!(instance.dependencies(), red_dep().as_slice());

        // Green(5) under ("red",) is a variant mismatch.
        let err = validator
            .construct("Color", "Green", vec![Value::Int(5)], red_dep())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::VariantMismatch {
                message: "Color".into(),
                tag: tag("Green"),
            }
        );
    }

    #[test]
    fn construct_checks_both_branches_for_every_tag() {
        let registry = registry();
        let validator = Validator::new(&registry);
        for (tag_name, field, good_dep, bad_dep) in [
            ("Red", Value::Int(5), "red", "green"),
            ("Green", Value::Int(5), "green", "red"),
        ] {
            assert!(validator
                .construct("Color", tag_name, vec![field.clone()], vec![good_dep.into()])
                .is_ok());
            assert!(matches!(
                validator.construct("Color", tag_name, vec![field], vec![bad_dep.into()]),
                Err(ValidationError::VariantMismatch { .. })
            ));
        }
    }

    #[test]
    fn construct_rejects_unknown_variant() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let err = validator
            .construct("Color", "Blue", vec![], red_dep())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownVariant {
                message: "Color".into(),
                tag: "Blue".into(),
            }
        );
    }

    #[test]
    fn construct_rejects_field_count_and_shape() {
        let registry = registry();
        let validator = Validator::new(&registry);

        let err = validator
            .construct("Color", "Red", vec![], red_dep())
            .unwrap_err();
        assert!(matches!(err, ValidationError::FieldCount { expected: 1, found: 0, .. }));

        let err = validator
            .construct("Color", "Red", vec![Value::Bool(true)], red_dep())
            .unwrap_err();
        assert!(matches!(err, ValidationError::FieldShape { .. }));
    }

    #[test]
    fn catch_all_tags_construct_for_any_dependencies() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let deps = vec![
            Value::Str("whatever".into()),
            Value::Message(
                Instance::literal("Color", tag("Red"), vec![Value::Int(0)]).unwrap(),
            ),
        ];
        assert!(validator
            .construct("House", "DefaultHouse", vec![], deps.clone())
            .is_ok());
        assert!(validator
            .construct("House", "DefaultHouse2", vec![], deps.clone())
            .is_ok());
        // No other tag succeeds under the catch-all.
        assert!(matches!(
            validator.construct(
                "House",
                "GreenHouse",
                vec![Value::Str("main st".into())],
                deps
            ),
            Err(ValidationError::VariantMismatch { .. })
        ));
    }

    // ── Derived dependencies ─────────────────────────────────────────

    #[test]
    fn derived_tuple_parameterizes_nested_check() {
        let registry = registry();
        let validator = Validator::new(&registry);

        // Scenario B: parent tuple (10,) derives 10 - 51 = -41 for the
        // child, whose table maps -41 to Low.
        let low = Instance::literal("Child", tag("Low"), vec![]).unwrap();
        let parent = validator
            .construct(
                "Parent",
                "Parent",
                vec![Value::Message(low)],
                vec![Value::Int(10)],
            )
            .unwrap();
        assert_eq!(parent.tag().as_str(), "Parent");

        // The wrong child variant for the derived value fails, and the
        // mismatch names the nested type — propagated unmodified.
        let high = Instance::literal("Child", tag("High"), vec![]).unwrap();
        let err = validator
            .construct(
                "Parent",
                "Parent",
                vec![Value::Message(high.clone())],
                vec![Value::Int(10)],
            )
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::VariantMismatch {
                message: "Child".into(),
                tag: tag("High"),
            }
        );

        // Under a different parent tuple the derived value changes and the
        // catch-all admits High.
        assert!(validator
            .construct(
                "Parent",
                "Parent",
                vec![Value::Message(high)],
                vec![Value::Int(0)],
            )
            .is_ok());
    }

    #[test]
    fn check_revalidates_under_a_new_tuple() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let red = validator
            .construct("Color", "Red", vec![Value::Int(5)], red_dep())
            .unwrap();

        // The same instance is legal under ("red",) and illegal under
        // ("green",) — bound dependencies are context, not identity.
        assert!(validator.check(&red, &red_dep()).is_ok());
        assert!(matches!(
            validator.check(&red, &[Value::Str("green".into())]),
            Err(ValidationError::VariantMismatch { .. })
        ));
    }

    #[test]
    fn message_typed_param_is_checked_against_its_derived_tuple() {
        // Gallery's signature constrains its color parameter to the tuple
        // ("green",): only a Green instance binds.
        let base = registry();
        let gallery = MessageType::new(
            "Gallery",
            vec![DependencyParam::new(
                "col",
                ParamType::Message {
                    message: "Color".into(),
                    dependencies: vec![DepExpr::lit("green")],
                },
            )],
            vec![Variant::new(tag("Gallery"), vec![])],
            vec![],
        )
        .unwrap();
        let mut builder = SchemaRegistry::builder();
        builder
            .register(base.get("Color").unwrap().as_ref().clone())
            .unwrap();
        builder.register(gallery).unwrap();
        let registry = builder.finish().unwrap();
        let validator = Validator::new(&registry);

        let green = Instance::literal("Color", tag("Green"), vec![Value::Int(3)]).unwrap();
        assert!(validator
            .construct("Gallery", "Gallery", vec![], vec![Value::Message(green)])
            .is_ok());

        let red = Instance::literal("Color", tag("Red"), vec![Value::Int(3)]).unwrap();
        let err = validator
            .construct("Gallery", "Gallery", vec![], vec![Value::Message(red)])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::VariantMismatch {
                message: "Color".into(),
                tag: tag("Red"),
            }
        );
    }

    #[test]
    fn unconstrained_message_type_admits_every_tag() {
        let registry = registry();
        let validator = Validator::new(&registry);
        // Parent has an empty table: its single tag resolves for any tuple.
        let legal = validator.resolve("Parent", &[Value::Int(123)]).unwrap();
        assert_eq!(tags(&legal), ["Parent"]);
    }

    #[test]
    fn slot_shape_mismatch_is_surfaced_not_false() {
        // A table whose slot kind disagrees with the declared signature can
        // only come from a hand-assembled schema; the comparison error is
        // surfaced as a usage error.
        let bad = MessageType::new(
            "Bad",
            vec![DependencyParam::new("b", ParamType::Scalar(ScalarType::Bool))],
            vec![Variant::new(tag("A"), vec![])],
            vec![DependencyPattern::new(
                vec![PatternSlot::Exact(Value::Int(1))],
                [tag("A")],
            )],
        )
        .unwrap();
        let mut builder = SchemaRegistry::builder();
        builder.register(bad).unwrap();
        let registry = builder.finish().unwrap();
        let validator = Validator::new(&registry);
        let err = validator.resolve("Bad", &[Value::Bool(true)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Type(TypeMismatch::Kind {
                left: "int",
                right: "bool",
            })
        );
    }

    // ── Purity ───────────────────────────────────────────────────────

    #[cfg(test)]
    mod prop_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Repeated resolution with identical tuples against an
            /// unmodified table returns identical sets.
            #[test]
            fn resolve_is_pure(s in "[a-z]{0,6}") {
                let registry = registry();
                let validator = Validator::new(&registry);
                let deps = vec![Value::Str(s)];
                let first = validator.resolve("Color", &deps).unwrap();
                for _ in 0..3 {
                    prop_assert_eq!(&first, &validator.resolve("Color", &deps).unwrap());
                }
            }
        }
    }
}
