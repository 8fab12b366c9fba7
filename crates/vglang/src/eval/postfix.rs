//! Postfix operations: indexing and member access
//!
//! The dot operator resolves namespace symbols, enum values, struct
//! fields, class statics, and instance fields/methods. It is rejected on
//! primitive values. Indexing requires an array operand and an integer
//! index within bounds.

use std::rc::Rc;

use crate::ast::{Expr, Span};
use crate::classes::ClassInstance;
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::{BoundMethod, StaticMethodRef, Value};

impl Interpreter {
    pub(crate) fn eval_index(
        &mut self,
        target: &Expr,
        index: &Expr,
        span: Span,
    ) -> Result<Value> {
        let target = self.eval_expr(target)?;
        let index_value = self.eval_expr(index)?;

        let elements = match &target {
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
        let idx = match index_value {
            Value::Int(n) => n,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    message: format!("array index must be an integer, got {}", other.type_name()),
                    span: Some(span),
                })
            }
        };

        let elements = elements.borrow();
        if idx < 0 || idx as usize >= elements.len() {
            return Err(RuntimeError::IndexOutOfBounds {
                index: idx,
                len: elements.len(),
                span: Some(span),
            });
        }
        Ok(elements[idx as usize].clone())
    }

    pub(crate) fn eval_member(
        &mut self,
        target: &Expr,
        name: &str,
        span: Span,
    ) -> Result<Value> {
        let target = self.eval_expr(target)?;

        match target {
            Value::Int(_) | Value::Double(_) | Value::Bool(_) | Value::Str(_) => {
                Err(RuntimeError::TypeMismatch {
                    message: format!(
                        "dot operator not supported on primitive type: {}",
                        target.type_name()
                    ),
                    span: Some(span),
                })
            }

            Value::Namespace(ns) => {
                ns.member(name).ok_or_else(|| RuntimeError::UndefinedName {
                    kind: "member",
                    name: format!("{}.{}", ns.name, name),
                    span: Some(span),
                })
            }

            Value::Library(lib) => lib
                .namespace(name)
                .map(Value::Namespace)
                .ok_or_else(|| RuntimeError::UndefinedName {
                    kind: "namespace",
                    name: format!("{}.{}", lib.name, name),
                    span: Some(span),
                }),

            Value::Enum(def) => def.value(name).map_err(|e| e.with_span(span)),

            // Reading a member off a struct definition instantiates it:
            // `createInstance` yields the instance, a field name yields the
            // fresh instance's default.
            Value::StructDef(def) => {
                if name == "createInstance" {
                    return Ok(Value::Struct(Rc::new(def.instantiate())));
                }
                let inst = def.instantiate();
                inst.get_field(name).map_err(|e| e.with_span(span))
            }

            Value::Struct(inst) => inst.get_field(name).map_err(|e| e.with_span(span)),

            Value::Class(id) => {
                if self.classes.static_method(id, name).is_some() {
                    Ok(Value::StaticMethod(Rc::new(StaticMethodRef {
                        class: id,
                        class_name: self.classes.name(id).to_string(),
                        method: name.to_string(),
                    })))
                } else {
                    Err(RuntimeError::MethodNotFound {
                        class: self.classes.name(id).to_string(),
                        method: name.to_string(),
                        span: Some(span),
                    })
                }
            }

            Value::Instance(inst) => self.instance_member(inst, name, span),

            other => Err(RuntimeError::TypeMismatch {
                message: format!(
                    "dot operator not supported on type: {}",
                    other.type_name()
                ),
                span: Some(span),
            }),
        }
    }

    fn instance_member(
        &mut self,
        inst: Rc<ClassInstance>,
        name: &str,
        span: Span,
    ) -> Result<Value> {
        if inst.has_field(name) {
            let private = self
                .classes
                .field_spec(inst.class(), name)
                .map(|spec| spec.private)
                .unwrap_or(false);
            if private && !self.in_class_context(inst.class_name()) {
                return Err(RuntimeError::PrivateAccess {
                    member_kind: "field",
                    name: name.to_string(),
                    span: Some(span),
                });
            }
            return inst.get_field(name).map_err(|e| e.with_span(span));
        }
        if self.classes.method(inst.class(), name).is_some() {
            return Ok(Value::Method(Rc::new(BoundMethod {
                instance: inst,
                method: name.to_string(),
            })));
        }
        Err(RuntimeError::MethodNotFound {
            class: inst.class_name().to_string(),
            method: name.to_string(),
            span: Some(span),
        })
    }

    /// Whether execution is currently inside a method or constructor of
    /// the named class (a `this` of that class is in scope).
    pub(crate) fn in_class_context(&self, class_name: &str) -> bool {
        match self.env.get("this") {
            Some(Value::Instance(current)) => current.class_name() == class_name,
            _ => false,
        }
    }
}
