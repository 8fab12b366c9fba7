//! Callable value types: functions, references, builtins, bound methods

use std::rc::Rc;

use crate::ast::Stmt;
use crate::classes::{ClassId, ClassInstance};
use crate::error::Result;
use crate::interpreter::Interpreter;

use super::Value;

/// A user-defined function.
///
/// Owns its parameter list and body; it does **not** capture the defining
/// environment — VG resolves free names dynamically against the live scope
/// stack at call time.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name (for diagnostics and arity errors)
    pub name: String,
    /// Parameter names, bound positionally
    pub params: Vec<String>,
    /// The body, shared so declarations are cheap to re-execute
    pub body: Rc<Vec<Stmt>>,
}

impl Function {
    /// Create a function value.
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            body: Rc::new(body),
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A function plus pre-bound leading arguments.
///
/// Used as an opaque callback handle: an event source invokes the
/// reference with runtime-supplied arguments, which are appended after the
/// captured ones.
#[derive(Debug, Clone)]
pub struct FunctionReference {
    /// The wrapped function
    pub function: Rc<Function>,
    /// Arguments bound when the reference was created
    pub captured: Vec<Value>,
}

impl FunctionReference {
    /// Create a reference with captured leading arguments.
    pub fn new(function: Rc<Function>, captured: Vec<Value>) -> Self {
        Self { function, captured }
    }
}

/// Signature of a built-in function implementation.
pub type BuiltinFnPtr = Rc<dyn Fn(&mut Interpreter, Vec<Value>) -> Result<Value>>;

/// A host-provided built-in function.
///
/// Builtins satisfy the same call contract as user functions but have no
/// body and no scope of their own.
#[derive(Clone)]
pub struct Builtin {
    /// Function name
    pub name: String,
    /// Fixed arity, or `None` for variadic builtins
    pub arity: Option<usize>,
    /// The implementation
    pub func: BuiltinFnPtr,
}

impl Builtin {
    /// Create a builtin with a fixed arity.
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&mut Interpreter, Vec<Value>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: Some(arity),
            func: Rc::new(func),
        }
    }

    /// Create a variadic builtin.
    pub fn variadic(
        name: impl Into<String>,
        func: impl Fn(&mut Interpreter, Vec<Value>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: None,
            func: Rc::new(func),
        }
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// A method bound to the instance it was resolved on.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    /// The receiver
    pub instance: Rc<ClassInstance>,
    /// Method name, resolved through the inheritance chain at call time
    pub method: String,
}

/// A static method resolved on a class.
#[derive(Debug, Clone)]
pub struct StaticMethodRef {
    /// The class the method was resolved on
    pub class: ClassId,
    /// Class name (for display)
    pub class_name: String,
    /// Method name
    pub method: String,
}

/// An entry in a scope's function table.
#[derive(Debug, Clone)]
pub enum Callable {
    /// A user-defined function
    Function(Rc<Function>),
    /// A built-in function
    Builtin(Builtin),
}

impl Callable {
    /// The callable's name.
    pub fn name(&self) -> &str {
        match self {
            Callable::Function(f) => &f.name,
            Callable::Builtin(b) => &b.name,
        }
    }
}
