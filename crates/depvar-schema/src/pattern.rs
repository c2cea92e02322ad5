//! # Dependency Pattern Tables
//!
//! A [`PatternTable`] maps dependency-value patterns to the variant tags
//! legal under them. Order is significant: resolution walks entries in
//! declaration order and stops at the first consistent pattern, so an
//! explicit case can be followed by a catch-all wildcard entry covering
//! several tags without ambiguity rules.
//!
//! Tables are validated as they are built. Arity mismatches, empty tag
//! sets, and undeclared tags are [`SchemaError`]s — fatal to schema
//! loading. Shadowing (an earlier pattern that makes a later one
//! unreachable) is a latent authoring bug, not a load failure: it is
//! surfaced as a `tracing` warning so legacy tables still load.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use depvar_core::{Value, VariantTag};

use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// PatternSlot
// ---------------------------------------------------------------------------

/// One position of a dependency pattern.
///
/// Wildcard is an explicit case, never a null/absent sentinel — a slot that
/// must equal an absent-looking value and a slot that does not care are
/// different declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSlot {
    /// Matches any actual value at this position.
    Wildcard,
    /// Matches an actual value structurally equal to the expected one.
    /// The expected value may itself be a constructed nested-variant literal.
    Exact(Value),
}

impl PatternSlot {
    /// Whether this slot admits the actual value.
    ///
    /// # Errors
    ///
    /// Propagates the structural-equality boundary error when an `Exact`
    /// slot and the actual value have mismatched shapes.
    pub fn admits(&self, actual: &Value) -> Result<bool, depvar_core::TypeMismatch> {
        match self {
            Self::Wildcard => Ok(true),
            Self::Exact(expected) => expected.structural_eq(actual),
        }
    }

    /// Whether this slot is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

// ---------------------------------------------------------------------------
// DependencyPattern
// ---------------------------------------------------------------------------

/// An ordered sequence of slots plus the tags legal when it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyPattern {
    /// Slots aligned with the message type's dependency signature.
    pub slots: Vec<PatternSlot>,
    /// The variant tags legal when this pattern matches. Never empty in a
    /// validated table.
    pub tags: BTreeSet<VariantTag>,
}

impl DependencyPattern {
    /// Convenience constructor.
    pub fn new(slots: Vec<PatternSlot>, tags: impl IntoIterator<Item = VariantTag>) -> Self {
        Self {
            slots,
            tags: tags.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// PatternTable
// ---------------------------------------------------------------------------

/// The validated, ordered pattern table of one message type.
///
/// Built once at schema-load time via [`PatternTable::build`]; immutable
/// afterwards. An empty table means the message type is unconstrained: every
/// declared variant is legal for any dependency values (the plain-message
/// case).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PatternTable {
    entries: Vec<DependencyPattern>,
}

impl PatternTable {
    /// Validate and build a table from declaration-ordered entries.
    ///
    /// `message` is the declaring message type (for diagnostics), `arity`
    /// its signature arity, and `declared_tags` the tags its variants carry.
    ///
    /// # Errors
    ///
    /// [`SchemaError::PatternArity`], [`SchemaError::EmptyTagSet`], or
    /// [`SchemaError::UnknownTag`] — all fatal to schema loading.
    pub fn build(
        message: &str,
        arity: usize,
        declared_tags: &BTreeSet<VariantTag>,
        entries: Vec<DependencyPattern>,
    ) -> Result<Self, SchemaError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.slots.len() != arity {
                return Err(SchemaError::PatternArity {
                    message: message.to_string(),
                    index,
                    expected: arity,
                    found: entry.slots.len(),
                });
            }
            if entry.tags.is_empty() {
                return Err(SchemaError::EmptyTagSet {
                    message: message.to_string(),
                    index,
                });
            }
            for tag in &entry.tags {
                if !declared_tags.contains(tag) {
                    return Err(SchemaError::UnknownTag {
                        message: message.to_string(),
                        index,
                        tag: tag.clone(),
                    });
                }
            }
        }

        // First-match-wins makes a shadowed pattern permanently dead, so
        // the authoring bug should at least be visible in the logs.
        for later in 1..entries.len() {
            for earlier in 0..later {
                if shadows(&entries[earlier], &entries[later]) {
                    tracing::warn!(
                        message,
                        earlier,
                        later,
                        "pattern is unreachable: every tuple it matches is \
                         already claimed by an earlier pattern"
                    );
                    break;
                }
            }
        }

        Ok(Self { entries })
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[DependencyPattern] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries (the unconstrained case).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Conservative shadowing check: `earlier` shadows `later` iff every actual
/// tuple matching `later` necessarily matches `earlier`. Slot-wise: the
/// earlier slot is a wildcard, or both slots are exact and structurally
/// equal. A comparison shape error means the slots admit disjoint values, so
/// no shadowing.
pub(crate) fn shadows(earlier: &DependencyPattern, later: &DependencyPattern) -> bool {
    earlier
        .slots
        .iter()
        .zip(&later.slots)
        .all(|(e, l)| match (e, l) {
            (PatternSlot::Wildcard, _) => true,
            (PatternSlot::Exact(_), PatternSlot::Wildcard) => false,
            (PatternSlot::Exact(a), PatternSlot::Exact(b)) => {
                a.structural_eq(b).unwrap_or(false)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> VariantTag {
        VariantTag::new(s).unwrap()
    }

    fn tags(names: &[&str]) -> BTreeSet<VariantTag> {
        names.iter().map(|n| tag(n)).collect()
    }

    fn exact(v: impl Into<Value>) -> PatternSlot {
        PatternSlot::Exact(v.into())
    }

    #[test]
    fn build_accepts_well_formed_table() {
        let table = PatternTable::build(
            "Color",
            1,
            &tags(&["Red", "Green"]),
            vec![
                DependencyPattern::new(vec![exact("red")], [tag("Red")]),
                DependencyPattern::new(vec![exact("green")], [tag("Green")]),
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn build_rejects_arity_mismatch() {
        let err = PatternTable::build(
            "Color",
            2,
            &tags(&["Red"]),
            vec![DependencyPattern::new(vec![exact("red")], [tag("Red")])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::PatternArity {
                message: "Color".into(),
                index: 0,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn build_rejects_empty_tag_set() {
        let err = PatternTable::build(
            "Color",
            1,
            &tags(&["Red"]),
            vec![DependencyPattern::new(vec![PatternSlot::Wildcard], [])],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyTagSet { index: 0, .. }));
    }

    #[test]
    fn build_rejects_undeclared_tag() {
        let err = PatternTable::build(
            "Color",
            1,
            &tags(&["Red"]),
            vec![DependencyPattern::new(
                vec![PatternSlot::Wildcard],
                [tag("Blue")],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTag { .. }));
    }

    #[test]
    fn wildcard_slot_admits_anything() {
        assert!(PatternSlot::Wildcard.admits(&Value::Int(1)).unwrap());
        assert!(PatternSlot::Wildcard.admits(&Value::Str("x".into())).unwrap());
    }

    #[test]
    fn exact_slot_admits_structurally_equal_values_only() {
        let slot = exact("red");
        assert!(slot.admits(&Value::Str("red".into())).unwrap());
        assert!(!slot.admits(&Value::Str("green".into())).unwrap());
        // Shape mismatch is an error, not `false`.
        assert!(slot.admits(&Value::Int(1)).is_err());
    }

    #[test]
    fn all_wildcard_pattern_shadows_everything() {
        let catch_all = DependencyPattern::new(
            vec![PatternSlot::Wildcard, PatternSlot::Wildcard],
            [tag("Default")],
        );
        let specific = DependencyPattern::new(
            vec![exact("green"), PatternSlot::Wildcard],
            [tag("GreenHouse")],
        );
        assert!(shadows(&catch_all, &specific));
        assert!(!shadows(&specific, &catch_all));
    }

    #[test]
    fn equal_exact_slots_shadow() {
        let a = DependencyPattern::new(vec![exact("red"), PatternSlot::Wildcard], [tag("A")]);
        let b = DependencyPattern::new(vec![exact("red"), exact(1i64)], [tag("B")]);
        assert!(shadows(&a, &b));
        assert!(!shadows(&b, &a));
    }

    #[test]
    fn disjoint_exact_slots_do_not_shadow() {
        let a = DependencyPattern::new(vec![exact("red")], [tag("A")]);
        let b = DependencyPattern::new(vec![exact("green")], [tag("B")]);
        assert!(!shadows(&a, &b));
        // Mismatched shapes admit disjoint values: no shadowing either.
        let c = DependencyPattern::new(vec![exact(1i64)], [tag("C")]);
        assert!(!shadows(&a, &c));
    }

    #[test]
    fn empty_table_builds() {
        let table = PatternTable::build("Plain", 0, &tags(&["Only"]), vec![]).unwrap();
        assert!(table.is_empty());
    }
}
