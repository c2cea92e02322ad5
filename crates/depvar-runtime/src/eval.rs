//! # Derived-Dependency Evaluation
//!
//! Evaluates [`DepExpr`] trees against the scope of an enclosing instance:
//! its dependency parameters and its field values, by name. Evaluation is
//! pure and runs fresh on every construction — derived tuples are never
//! cached, because the enclosing instance's values differ across calls.
//!
//! Integer arithmetic is checked: overflow, underflow, and division by zero
//! surface as [`ExpressionError`]s. Float arithmetic follows IEEE-754
//! (division by zero yields an infinity, not an error). Boolean connectives
//! short-circuit, as the source expressions expect.

use depvar_core::{Instance, Value};
use depvar_schema::{BinaryOp, DepExpr, MessageType, UnaryOp, Variant};

use crate::error::ExpressionError;

/// Name-to-value bindings for one evaluation: the enclosing instance's
/// dependency parameters first, then its fields. The front end keeps the two
/// namespaces disjoint.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    bindings: Vec<(&'a str, &'a Value)>,
}

impl<'a> Scope<'a> {
    /// An empty scope (literal-only expressions).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The scope of an instance: `dependencies` bound to the signature's
    /// parameter names, the instance's fields bound to the variant's field
    /// names.
    ///
    /// Callers must have validated arities first; surplus names or values
    /// are not bound.
    pub fn of_instance(
        decl: &'a MessageType,
        variant: &'a Variant,
        instance: &'a Instance,
        dependencies: &'a [Value],
    ) -> Self {
        let mut scope = Self {
            bindings: Vec::with_capacity(decl.arity() + variant.fields.len()),
        };
        for (param, value) in decl.dependencies().iter().zip(dependencies) {
            scope.bind(&param.name, value);
        }
        for (field, value) in variant.fields.iter().zip(instance.fields()) {
            scope.bind(&field.name, value);
        }
        scope
    }

    /// Add one binding.
    pub fn bind(&mut self, name: &'a str, value: &'a Value) {
        self.bindings.push((name, value));
    }

    /// Look up a name; first binding wins.
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| *value)
    }
}

/// Evaluate one expression in the given scope.
///
/// # Errors
///
/// [`ExpressionError`] on unbound names, kind mismatches, or failed checked
/// integer arithmetic — all schema-authoring defects, surfaced unmodified.
pub fn eval(expr: &DepExpr, scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    match expr {
        DepExpr::Lit(value) => Ok(value.clone()),
        DepExpr::Var(name) => scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| ExpressionError::Unbound(name.clone())),
        DepExpr::Unary { op, expr } => apply_unary(*op, eval(expr, scope)?),
        DepExpr::Binary { op, left, right } => match op {
            BinaryOp::And | BinaryOp::Or => apply_connective(*op, left, right, scope),
            _ => apply_arithmetic(*op, eval(left, scope)?, eval(right, scope)?),
        },
        DepExpr::Construct {
            message,
            tag,
            fields,
        } => {
            let values = fields
                .iter()
                .map(|field| eval(field, scope))
                .collect::<Result<Vec<_>, _>>()?;
            let literal = Instance::literal(message.clone(), tag.clone(), values)?;
            Ok(Value::Message(literal))
        }
    }
}

fn apply_unary(op: UnaryOp, operand: Value) -> Result<Value, ExpressionError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(v)) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or(ExpressionError::Overflow { op: op.symbol() }),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Not, Value::Bool(v)) => Ok(Value::Bool(!v)),
        (op, operand) => Err(ExpressionError::Operand {
            op: op.symbol(),
            found: operand.kind(),
        }),
    }
}

/// Short-circuiting `&&` / `||`: the right operand is only evaluated when
/// the left one does not decide the result.
fn apply_connective(
    op: BinaryOp,
    left: &DepExpr,
    right: &DepExpr,
    scope: &Scope<'_>,
) -> Result<Value, ExpressionError> {
    let lhs = match eval(left, scope)? {
        Value::Bool(b) => b,
        other => {
            return Err(ExpressionError::Operand {
                op: op.symbol(),
                found: other.kind(),
            })
        }
    };
    match (op, lhs) {
        (BinaryOp::And, false) => Ok(Value::Bool(false)),
        (BinaryOp::Or, true) => Ok(Value::Bool(true)),
        _ => match eval(right, scope)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(ExpressionError::Operand {
                op: op.symbol(),
                found: other.kind(),
            }),
        },
    }
}

fn apply_arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value, ExpressionError> {
    let symbol = op.symbol();
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div => {
                    if b == 0 {
                        return Err(ExpressionError::DivisionByZero);
                    }
                    a.checked_div(b)
                }
                BinaryOp::And | BinaryOp::Or => {
                    return Err(ExpressionError::Type {
                        op: symbol,
                        left: "int",
                        right: "int",
                    })
                }
            };
            result
                .map(Value::Int)
                .ok_or(ExpressionError::Overflow { op: symbol })
        }
        (Value::Uint(a), Value::Uint(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div => {
                    if b == 0 {
                        return Err(ExpressionError::DivisionByZero);
                    }
                    a.checked_div(b)
                }
                BinaryOp::And | BinaryOp::Or => {
                    return Err(ExpressionError::Type {
                        op: symbol,
                        left: "unsigned",
                        right: "unsigned",
                    })
                }
            };
            result
                .map(Value::Uint)
                .ok_or(ExpressionError::Overflow { op: symbol })
        }
        (Value::Float(a), Value::Float(b)) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::And | BinaryOp::Or => {
                    return Err(ExpressionError::Type {
                        op: symbol,
                        left: "float",
                        right: "float",
                    })
                }
            };
            Ok(Value::Float(result))
        }
        (left, right) => Err(ExpressionError::Type {
            op: symbol,
            left: left.kind(),
            right: right.kind(),
        }),
    }
}
