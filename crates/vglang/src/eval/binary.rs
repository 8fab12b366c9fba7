//! Binary operation evaluation
//!
//! Logical operators short-circuit on the left operand's truthiness and
//! yield booleans. `+` is overloaded: if either operand is a string the
//! result is the concatenation of both operands' string forms; otherwise
//! both operands must be numeric. Arithmetic on two numbers yields a
//! double if either operand is a double, else an int. Division and
//! remainder by zero are fatal, for doubles too.

use crate::ast::{BinOp, Expr, Span};
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        span: Span,
    ) -> Result<Value> {
        // Short-circuit forms evaluate the right operand lazily
        match op {
            BinOp::Or => {
                if self.eval_expr(lhs)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let rhs = self.eval_expr(rhs)?;
                return Ok(Value::Bool(rhs.is_truthy()));
            }
            BinOp::And => {
                if !self.eval_expr(lhs)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let rhs = self.eval_expr(rhs)?;
                return Ok(Value::Bool(rhs.is_truthy()));
            }
            _ => {}
        }

        let left = self.eval_expr(lhs)?;
        let right = self.eval_expr(rhs)?;

        match op {
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                eval_relational(op, left, right, span)
            }
            BinOp::Add => eval_add(left, right, span),
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => {
                eval_arithmetic(op, left, right, span)
            }
            BinOp::Or | BinOp::And => unreachable!(),
        }
    }
}

fn eval_relational(op: BinOp, left: Value, right: Value, span: Span) -> Result<Value> {
    let (l, r) = match numeric_pair(&left, &right) {
        Some(pair) => pair,
        None => {
            return Err(RuntimeError::TypeMismatch {
                message: format!(
                    "relational operator '{}' requires numeric operands, got {} and {}",
                    op.symbol(),
                    left.type_name(),
                    right.type_name()
                ),
                span: Some(span),
            })
        }
    };
    let result = match op {
        BinOp::Lt => l < r,
        BinOp::Le => l <= r,
        BinOp::Gt => l > r,
        BinOp::Ge => l >= r,
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}

fn eval_add(left: Value, right: Value, span: Span) -> Result<Value> {
    // String concatenation wins whenever either side is a string
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        return Ok(Value::string(format!("{}{}", left, right)));
    }
    eval_arithmetic(BinOp::Add, left, right, span)
}

fn eval_arithmetic(op: BinOp, left: Value, right: Value, span: Span) -> Result<Value> {
    if matches!(left, Value::Array(_)) || matches!(right, Value::Array(_)) {
        return Err(RuntimeError::TypeMismatch {
            message: format!("cannot apply operator '{}' to arrays", op.symbol()),
            span: Some(span),
        });
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_arith(op, *a, *b, span),
        (Value::Int(a), Value::Double(b)) => eval_double_arith(op, *a as f64, *b, span),
        (Value::Double(a), Value::Int(b)) => eval_double_arith(op, *a, *b as f64, span),
        (Value::Double(a), Value::Double(b)) => eval_double_arith(op, *a, *b, span),
        _ => Err(RuntimeError::TypeMismatch {
            message: format!(
                "invalid operands for operator '{}': {} and {}",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ),
            span: Some(span),
        }),
    }
}

fn eval_int_arith(op: BinOp, a: i64, b: i64, span: Span) -> Result<Value> {
    let result = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { span: Some(span) });
            }
            a.wrapping_div(b)
        }
        BinOp::Rem => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { span: Some(span) });
            }
            a.wrapping_rem(b)
        }
        _ => unreachable!(),
    };
    Ok(Value::Int(result))
}

fn eval_double_arith(op: BinOp, a: f64, b: f64, span: Span) -> Result<Value> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { span: Some(span) });
            }
            a / b
        }
        BinOp::Rem => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { span: Some(span) });
            }
            a % b
        }
        _ => unreachable!(),
    };
    Ok(Value::Double(result))
}

/// Both operands as doubles when both are numeric.
fn numeric_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    let l = match left {
        Value::Int(n) => *n as f64,
        Value::Double(n) => *n,
        _ => return None,
    };
    let r = match right {
        Value::Int(n) => *n as f64,
        Value::Double(n) => *n,
        _ => return None,
    };
    Some((l, r))
}
