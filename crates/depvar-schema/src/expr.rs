//! # Dependency Expression Trees
//!
//! [`DepExpr`] is the compiled form of a derived-dependency expression: a
//! pure, finite tree over the enclosing instance's dependency parameters and
//! field values. The front end type-checks these before they reach the
//! runtime; this crate only carries them. Evaluation lives in the runtime
//! crate and happens fresh on every construction — results are never cached.

use std::fmt;

use serde::{Deserialize, Serialize};

use depvar_core::{Value, VariantTag};

/// Binary operators: arithmetic on integers, connectives on booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `&&` (short-circuiting)
    And,
    /// `||` (short-circuiting)
    Or,
}

impl BinaryOp {
    /// Surface syntax for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Boolean negation.
    Not,
}

impl UnaryOp {
    /// Surface syntax for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// A compiled derived-dependency expression.
///
/// Variable access resolves against the enclosing instance's scope:
/// dependency parameters first, then fields. [`DepExpr::Construct`] builds a
/// nested-variant literal used purely as a comparison target inside a
/// pattern — such literals carry no dependency bindings and are never
/// persisted as schema values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepExpr {
    /// A literal value.
    Lit(Value),
    /// A dependency parameter or field of the enclosing instance, by name.
    Var(String),
    /// Unary application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        expr: Box<DepExpr>,
    },
    /// Binary application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<DepExpr>,
        /// Right operand.
        right: Box<DepExpr>,
    },
    /// Literal construction of a nested-variant comparison target.
    Construct {
        /// Target message type.
        message: String,
        /// Constructed variant tag.
        tag: VariantTag,
        /// Field expressions in declaration order.
        fields: Vec<DepExpr>,
    },
}

impl DepExpr {
    /// Literal convenience.
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Lit(value.into())
    }

    /// Variable-access convenience.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Unary-application convenience.
    pub fn unary(op: UnaryOp, expr: DepExpr) -> Self {
        Self::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    /// Binary-application convenience.
    pub fn binary(op: BinaryOp, left: DepExpr, right: DepExpr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Construction convenience.
    pub fn construct(
        message: impl Into<String>,
        tag: VariantTag,
        fields: Vec<DepExpr>,
    ) -> Self {
        Self::Construct {
            message: message.into(),
            tag,
            fields,
        }
    }

    /// Pre-order traversal over the whole tree, `self` included.
    pub fn walk(&self, visit: &mut impl FnMut(&DepExpr)) {
        visit(self);
        match self {
            Self::Lit(_) | Self::Var(_) => {}
            Self::Unary { expr, .. } => expr.walk(visit),
            Self::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Self::Construct { fields, .. } => {
                for field in fields {
                    field.walk(visit);
                }
            }
        }
    }
}

impl fmt::Display for DepExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lit(value) => write!(f, "{value}"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Unary { op, expr } => write!(f, "{}{expr}", op.symbol()),
            Self::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Self::Construct {
                message,
                tag,
                fields,
            } => {
                write!(f, "{message}::{tag}(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}
