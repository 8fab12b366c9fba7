//! Type declarations and imports
//!
//! Class declarations evaluate field defaults once, resolve the superclass
//! against the scope stack, and register the definition in the arena with
//! the class handle bound in the current scope. Struct and enum
//! declarations bind their definition values. Imports attach registered
//! library content to the global scope.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{ClassDecl, Expr, Span, Stmt};
use crate::classes::{ClassDef, Constructor, FieldSpec, Method};
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::{Callable, EnumDef, Function, StructDef, Value};

impl Interpreter {
    pub(crate) fn exec_fn_decl(&mut self, name: &str, params: &[String], body: &[Stmt]) {
        let func = Rc::new(Function::new(name.to_string(), params.to_vec(), body.to_vec()));
        // Functions enter the function table and are bound as values, so
        // they can also be stored, passed, and called through variables.
        self.env
            .declare_function(name.to_string(), Callable::Function(func.clone()));
        self.env.declare(name.to_string(), Value::Function(func));
    }

    pub(crate) fn exec_class_decl(&mut self, decl: &ClassDecl, span: Span) -> Result<()> {
        let superclass = match &decl.superclass {
            Some(super_name) => match self.env.get(super_name) {
                Some(Value::Class(id)) => Some(*id),
                _ => {
                    return Err(RuntimeError::UndefinedName {
                        kind: "class",
                        name: super_name.clone(),
                        span: Some(span),
                    })
                }
            },
            None => None,
        };

        let mut def = ClassDef::new(decl.name.clone(), decl.superclass.clone());

        for field in &decl.fields {
            let default = match &field.default {
                Some(expr) => self.eval_expr(expr)?,
                None => Value::Null,
            };
            def.add_field(
                field.name.clone(),
                FieldSpec {
                    default,
                    private: field.private,
                    is_static: field.is_static,
                    is_const: field.is_const,
                },
            );
        }

        for ctor in &decl.constructors {
            def.add_constructor(Constructor {
                params: ctor.params.clone(),
                body: Rc::new(ctor.body.clone()),
                private: ctor.private,
                span: ctor.span,
            });
        }

        for method in &decl.methods {
            def.add_method(Method {
                name: method.name.clone(),
                params: method.params.clone(),
                body: Rc::new(method.body.clone()),
                private: method.private,
                is_static: method.is_static,
                is_const: method.is_const,
                span: method.span,
            });
        }

        let id = self.classes.register(def, superclass);
        self.env.declare(decl.name.clone(), Value::Class(id));
        Ok(())
    }

    pub(crate) fn exec_struct_decl(&mut self, name: &str, fields: &[String]) {
        let def = StructDef::new(name.to_string(), fields.to_vec());
        self.env
            .declare(name.to_string(), Value::StructDef(Rc::new(def)));
    }

    pub(crate) fn exec_enum_decl(
        &mut self,
        name: &str,
        variants: &[(String, Option<Expr>)],
    ) -> Result<()> {
        let mut values = IndexMap::new();
        let mut auto_value: i64 = 0;
        for (variant, explicit) in variants {
            let value = match explicit {
                Some(expr) => {
                    let v = self.eval_expr(expr)?;
                    if let Value::Int(n) = v {
                        auto_value = n + 1;
                    }
                    v
                }
                None => {
                    let v = Value::Int(auto_value);
                    auto_value += 1;
                    v
                }
            };
            values.insert(variant.clone(), value);
        }
        let def = EnumDef::new(name.to_string(), values);
        self.env
            .declare(name.to_string(), Value::Enum(Rc::new(def)));
        Ok(())
    }

    pub(crate) fn exec_import(
        &mut self,
        path: &[String],
        wildcard: bool,
        span: Span,
    ) -> Result<()> {
        if path.len() < 2 {
            return Err(RuntimeError::TypeMismatch {
                message: format!("invalid import path: {}", path.join(".")),
                span: Some(span),
            });
        }

        let library =
            self.modules
                .library(&path[0])
                .ok_or_else(|| RuntimeError::UndefinedName {
                    kind: "library",
                    name: path[0].clone(),
                    span: Some(span),
                })?;

        if wildcard {
            // import lib.ns(...nested).*  — every symbol into global scope
            let ns = library
                .namespace(&path[1])
                .and_then(|ns| ns.nested(&path[2..]))
                .ok_or_else(|| RuntimeError::UndefinedName {
                    kind: "namespace",
                    name: path[1..].join("."),
                    span: Some(span),
                })?;
            for (name, value) in &ns.symbols {
                if let Value::Function(f) = value {
                    self.env
                        .declare_function_global(name.clone(), Callable::Function(f.clone()));
                }
                self.env.declare_global(name.clone(), value.clone());
            }
            return Ok(());
        }

        if path.len() == 2 {
            // import lib.ns  — bind the namespace handle
            let ns = library
                .namespace(&path[1])
                .ok_or_else(|| RuntimeError::UndefinedName {
                    kind: "namespace",
                    name: path[1].clone(),
                    span: Some(span),
                })?;
            self.env
                .declare_global(path[1].clone(), Value::Namespace(ns));
            return Ok(());
        }

        // import lib.ns(...nested).symbol  — bind one symbol (or a child
        // namespace of that name)
        let ns_path = &path[1..path.len() - 1];
        let symbol_name = &path[path.len() - 1];
        let ns = library
            .namespace(&ns_path[0])
            .and_then(|ns| ns.nested(&ns_path[1..]))
            .ok_or_else(|| RuntimeError::UndefinedName {
                kind: "namespace",
                name: ns_path.join("."),
                span: Some(span),
            })?;

        let value = ns
            .member(symbol_name)
            .ok_or_else(|| RuntimeError::UndefinedName {
                kind: "symbol",
                name: path.join("."),
                span: Some(span),
            })?;
        if let Value::Function(f) = &value {
            self.env
                .declare_function_global(symbol_name.clone(), Callable::Function(f.clone()));
        }
        self.env.declare_global(symbol_name.clone(), value);
        Ok(())
    }
}
