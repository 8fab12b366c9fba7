//! Function, method, and constructor invocation
//!
//! Every invocation follows the same contract: check the argument count
//! against the arity, push one fresh scope, bind parameters positionally,
//! execute the body, and pop the scope on every exit path — including
//! errors. A `return` signal is consumed exactly here; a body that falls
//! through yields null.
//!
//! Named calls resolve in order: built-ins, the scope stack's function
//! tables, then variables holding callable values.

use std::rc::Rc;

use crate::ast::{Expr, ExprKind, Span};
use crate::classes::{ClassId, ClassInstance};
use crate::error::{Result, RuntimeError};
use crate::eval::Flow;
use crate::interpreter::Interpreter;
use crate::value::{Builtin, Callable, Function, FunctionReference, Value};

impl Interpreter {
    pub(crate) fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        span: Span,
    ) -> Result<Value> {
        if let ExprKind::Ident(name) = &callee.kind {
            let arg_values = self.eval_args(args)?;
            if let Some(builtin) = self.builtins.get(name).cloned() {
                return self.call_builtin(&builtin, arg_values, span);
            }
            if let Some(callable) = self.env.lookup_function(name) {
                return match callable {
                    Callable::Function(f) => self.call_function_at(&f, arg_values, Some(span)),
                    Callable::Builtin(b) => self.call_builtin(&b, arg_values, span),
                };
            }
            // Fall back to a variable holding a callable value
            let value = self.env.read(name).map_err(|_| RuntimeError::UndefinedName {
                kind: "function",
                name: name.clone(),
                span: Some(span),
            })?;
            return self.call_value(value, arg_values, span);
        }

        // General form: resolve the callee, then evaluate arguments
        let callee_value = self.eval_expr(callee)?;
        let arg_values = self.eval_args(args)?;
        self.call_value(callee_value, arg_values, span)
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    /// Call any callable value.
    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value> {
        match callee {
            Value::Function(f) => self.call_function_at(&f, args, Some(span)),
            Value::FunctionRef(r) => self.call_reference_at(&r, args, Some(span)),
            Value::Builtin(b) => self.call_builtin(&b, args, span),
            Value::Method(m) => {
                self.call_method(m.instance.clone(), &m.method, args, Some(span))
            }
            Value::StaticMethod(s) => {
                self.call_static_method(s.class, &s.method, args, Some(span))
            }
            other => Err(RuntimeError::TypeMismatch {
                message: format!("cannot call a non-function value: {}", other.type_name()),
                span: Some(span),
            }),
        }
    }

    /// Call a user-defined function (the host bridge's entry point).
    pub fn call_function(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        self.call_function_at(func, args, None)
    }

    pub(crate) fn call_function_at(
        &mut self,
        func: &Function,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        if args.len() != func.arity() {
            return Err(RuntimeError::ArgumentCount {
                name: func.name.clone(),
                expected: func.arity(),
                actual: args.len(),
                span,
            });
        }

        self.env.enter_call()?;
        self.env.push_scope();
        for (param, arg) in func.params.iter().zip(args) {
            self.env.declare(param.clone(), arg);
        }

        let body = func.body.clone();
        let result = self.exec_block(&body);

        self.env.pop_scope();
        self.env.exit_call();

        finish_call(result)
    }

    /// Call a function reference, prepending its captured arguments.
    pub fn call_reference(&mut self, reference: &FunctionReference, args: Vec<Value>) -> Result<Value> {
        self.call_reference_at(reference, args, None)
    }

    fn call_reference_at(
        &mut self,
        reference: &FunctionReference,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        let mut all_args = reference.captured.clone();
        all_args.extend(args);
        self.call_function_at(&reference.function, all_args, span)
    }

    pub(crate) fn call_builtin(
        &mut self,
        builtin: &Builtin,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value> {
        if let Some(arity) = builtin.arity {
            if args.len() != arity {
                return Err(RuntimeError::ArgumentCount {
                    name: builtin.name.clone(),
                    expected: arity,
                    actual: args.len(),
                    span: Some(span),
                });
            }
        }
        let func = builtin.func.clone();
        func(self, args)
    }

    /// Invoke a method on an instance, resolving it through the
    /// inheritance chain.
    pub(crate) fn call_method(
        &mut self,
        instance: Rc<ClassInstance>,
        name: &str,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        let method = self.classes.method(instance.class(), name).ok_or_else(|| {
            RuntimeError::MethodNotFound {
                class: instance.class_name().to_string(),
                method: name.to_string(),
                span,
            }
        })?;
        if method.private && !self.in_class_context(instance.class_name()) {
            return Err(RuntimeError::PrivateAccess {
                member_kind: "method",
                name: name.to_string(),
                span,
            });
        }
        if args.len() != method.params.len() {
            return Err(RuntimeError::ArgumentCount {
                name: name.to_string(),
                expected: method.params.len(),
                actual: args.len(),
                span,
            });
        }

        self.env.enter_call()?;
        self.env.push_scope();
        self.env
            .declare("this", Value::Instance(instance.clone()));
        for (param, arg) in method.params.iter().zip(args) {
            self.env.declare(param.clone(), arg);
        }

        let result = self.exec_block(&method.body);

        self.env.pop_scope();
        self.env.exit_call();

        finish_call(result)
    }

    /// Invoke a static method on a class (no `this` binding).
    pub(crate) fn call_static_method(
        &mut self,
        class: ClassId,
        name: &str,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        let method = self.classes.static_method(class, name).ok_or_else(|| {
            RuntimeError::MethodNotFound {
                class: self.classes.name(class).to_string(),
                method: name.to_string(),
                span,
            }
        })?;
        if method.private && !self.in_class_context(self.classes.name(class)) {
            return Err(RuntimeError::PrivateAccess {
                member_kind: "static method",
                name: name.to_string(),
                span,
            });
        }
        if args.len() != method.params.len() {
            return Err(RuntimeError::ArgumentCount {
                name: name.to_string(),
                expected: method.params.len(),
                actual: args.len(),
                span,
            });
        }

        self.env.enter_call()?;
        self.env.push_scope();
        for (param, arg) in method.params.iter().zip(args) {
            self.env.declare(param.clone(), arg);
        }

        let result = self.exec_block(&method.body);

        self.env.pop_scope();
        self.env.exit_call();

        finish_call(result)
    }

    /// Evaluate `new Class(args...)`.
    pub(crate) fn construct(
        &mut self,
        class_name: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Value> {
        let class_id = match self.env.get(class_name) {
            Some(Value::Class(id)) => *id,
            _ => {
                return Err(RuntimeError::UndefinedName {
                    kind: "class",
                    name: class_name.to_string(),
                    span: Some(span),
                })
            }
        };

        let arg_values = self.eval_args(args)?;
        let ctor = self
            .classes
            .find_constructor(class_id, arg_values.len())
            .ok_or_else(|| RuntimeError::ConstructorNotFound {
                class: class_name.to_string(),
                arity: arg_values.len(),
                span: Some(span),
            })?;
        if ctor.private && !self.in_class_context(class_name) {
            return Err(RuntimeError::PrivateAccess {
                member_kind: "constructor",
                name: class_name.to_string(),
                span: Some(span),
            });
        }

        let instance = self.classes.create_instance(class_id);

        self.env.enter_call()?;
        self.env.push_scope();
        self.env
            .declare("this", Value::Instance(instance.clone()));
        for (param, arg) in ctor.params.iter().zip(arg_values) {
            self.env.declare(param.clone(), arg);
        }

        let result = self.exec_block(&ctor.body);

        self.env.pop_scope();
        self.env.exit_call();

        // A `return` inside a constructor is tolerated and its value
        // discarded; the instance is the result either way.
        finish_call(result)?;
        instance.mark_initialized();
        Ok(Value::Instance(instance))
    }

    /// Evaluate a function reference expression, binding captured
    /// arguments now.
    pub(crate) fn eval_function_ref(
        &mut self,
        path: &[String],
        captured: &[Expr],
        span: Span,
    ) -> Result<Value> {
        let function = self
            .resolve_function_path(path)
            .map_err(|e| e.with_span(span))?;
        let captured_values = self.eval_args(captured)?;
        Ok(Value::FunctionRef(Rc::new(FunctionReference::new(
            function,
            captured_values,
        ))))
    }
}

/// Translate a body's flow into the call's result: a return signal yields
/// its value, fall-through yields null, and a stray loop signal is an
/// error at the call boundary.
fn finish_call(result: Result<Flow>) -> Result<Value> {
    match result? {
        Flow::Return(value) => Ok(value),
        Flow::Normal => Ok(Value::Null),
        Flow::Break => Err(RuntimeError::type_mismatch("'break' outside of a loop")),
        Flow::Continue => Err(RuntimeError::type_mismatch("'continue' outside of a loop")),
    }
}
