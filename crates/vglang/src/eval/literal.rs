//! Literal and array-literal evaluation

use crate::ast::{Expr, Literal};
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Convert a literal node to its runtime value.
pub fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Int(n) => Value::Int(*n),
        Literal::Double(n) => Value::Double(*n),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Str(s) => Value::string(s.clone()),
    }
}

impl Interpreter {
    /// Evaluate `[a, b, c]` to a fresh array.
    pub(crate) fn eval_array_literal(&mut self, elements: &[Expr]) -> Result<Value> {
        let mut values = Vec::with_capacity(elements.len());
        for e in elements {
            values.push(self.eval_expr(e)?);
        }
        Ok(Value::array(values))
    }
}
