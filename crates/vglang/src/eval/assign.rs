//! Assignment execution
//!
//! Targets are plain names (resolved stack-wide, constants rejected),
//! nested array elements through index chains, and object fields. Writing
//! a field through a name bound to a struct *definition* instantiates the
//! struct and rebinds the name first — a struct comes to life on its first
//! field write.

use std::rc::Rc;

use crate::ast::{AssignTarget, Expr, ExprKind, Span};
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn exec_assign(
        &mut self,
        target: &AssignTarget,
        value_expr: &Expr,
        span: Span,
    ) -> Result<()> {
        match target {
            AssignTarget::Name { name, indices } if indices.is_empty() => {
                // Resolve the target before evaluating the right-hand side
                match self.env.is_constant(name) {
                    Some(true) => {
                        return Err(RuntimeError::ConstAssignment {
                            name: name.clone(),
                            span: Some(span),
                        })
                    }
                    Some(false) => {}
                    None => {
                        return Err(RuntimeError::UndefinedName {
                            kind: "variable",
                            name: name.clone(),
                            span: Some(span),
                        })
                    }
                }
                let value = self.eval_expr(value_expr)?;
                self.env.assign(name, value).map_err(|e| e.with_span(span))
            }

            AssignTarget::Name { name, indices } => {
                self.assign_indexed(name, indices, value_expr, span)
            }

            AssignTarget::Field { object, field } => {
                self.assign_field(object, field, value_expr, span)
            }
        }
    }

    fn assign_indexed(
        &mut self,
        name: &str,
        indices: &[Expr],
        value_expr: &Expr,
        span: Span,
    ) -> Result<()> {
        if self.env.is_constant(name) == Some(true) {
            return Err(RuntimeError::ConstAssignment {
                name: name.to_string(),
                span: Some(span),
            });
        }

        let mut index_values = Vec::with_capacity(indices.len());
        for idx in indices {
            match self.eval_expr(idx)? {
                Value::Int(n) => index_values.push(n),
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        message: format!(
                            "array index must be an integer, got {}",
                            other.type_name()
                        ),
                        span: Some(idx.span),
                    })
                }
            }
        }

        let value = self.eval_expr(value_expr)?;
        let current = self.env.read(name).map_err(|e| e.with_span(span))?;

        // Walk to the innermost array, then set the final element
        let mut array = match current {
            Value::Array(elements) => elements,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    message: format!(
                        "cannot use [] operator on non-array value: {}",
                        other.type_name()
                    ),
                    span: Some(span),
                })
            }
        };
        for &idx in &index_values[..index_values.len() - 1] {
            let next = {
                let elements = array.borrow();
                check_bounds(idx, elements.len(), span)?;
                elements[idx as usize].clone()
            };
            array = match next {
                Value::Array(elements) => elements,
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        message: format!(
                            "cannot use [] operator on non-array value: {}",
                            other.type_name()
                        ),
                        span: Some(span),
                    })
                }
            };
        }

        let last = index_values[index_values.len() - 1];
        let mut elements = array.borrow_mut();
        check_bounds(last, elements.len(), span)?;
        elements[last as usize] = value;
        Ok(())
    }

    fn assign_field(
        &mut self,
        object: &Expr,
        field: &str,
        value_expr: &Expr,
        span: Span,
    ) -> Result<()> {
        let target = self.eval_expr(object)?;
        let value = self.eval_expr(value_expr)?;

        match target {
            Value::Instance(inst) => inst
                .set_field(&self.classes, field, value)
                .map_err(|e| e.with_span(span)),

            Value::Struct(inst) => {
                inst.set_field(field, value);
                Ok(())
            }

            // First field write through a name bound to a struct
            // definition instantiates it and rebinds the name.
            Value::StructDef(def) => {
                let instance = Rc::new(def.instantiate());
                instance.set_field(field, value);
                if let ExprKind::Ident(name) = &object.kind {
                    self.env.rebind(name, Value::Struct(instance));
                    Ok(())
                } else {
                    Err(RuntimeError::TypeMismatch {
                        message: format!(
                            "cannot assign field '{}' on an unnamed struct definition",
                            field
                        ),
                        span: Some(span),
                    })
                }
            }

            other => Err(RuntimeError::TypeMismatch {
                message: format!(
                    "cannot assign field '{}' on non-struct/class value: {}",
                    field,
                    other.type_name()
                ),
                span: Some(span),
            }),
        }
    }
}

fn check_bounds(index: i64, len: usize, span: Span) -> Result<()> {
    if index < 0 || index as usize >= len {
        return Err(RuntimeError::IndexOutOfBounds {
            index,
            len,
            span: Some(span),
        });
    }
    Ok(())
}
