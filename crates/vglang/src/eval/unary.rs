//! Unary operation evaluation

use crate::ast::{Expr, Span, UnaryOp};
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn eval_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        span: Span,
    ) -> Result<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Plus => match value {
                Value::Int(_) | Value::Double(_) => Ok(value),
                other => Err(numeric_operand_error("+", &other, span)),
            },
            UnaryOp::Neg => match value {
                Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                Value::Double(n) => Ok(Value::Double(-n)),
                other => Err(numeric_operand_error("-", &other, span)),
            },
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}

fn numeric_operand_error(op: &str, value: &Value, span: Span) -> RuntimeError {
    RuntimeError::TypeMismatch {
        message: format!(
            "unary '{}' requires a numeric operand, got {}",
            op,
            value.type_name()
        ),
        span: Some(span),
    }
}
