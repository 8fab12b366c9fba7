//! The scope stack: variable, constant, and function bindings
//!
//! Uses a flat binding vector with frame boundaries for cheap scope
//! entry/exit. One persistent global scope sits at the bottom and is never
//! popped; a new scope is pushed for every function call, `for` statement,
//! and `catch` block.
//!
//! Name resolution is **stack-wide and dynamic**: `read`, `assign`, and
//! `lookup_function` scan from the newest scope down to the global scope
//! and take the first match. A called function therefore observes its
//! caller's locals when nothing shadows the name. This is the language's
//! defined behavior, not lexical closure lookup.

use crate::error::{Result, RuntimeError};
use crate::value::{Callable, Value};

/// A single variable binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,
    /// The bound value
    pub value: Value,
    /// Whether the name was declared `const`
    pub constant: bool,
}

/// An entry in a scope's function table, disjoint from variables.
#[derive(Debug, Clone)]
struct FnBinding {
    name: String,
    func: Callable,
}

/// Frame boundaries into the flat binding vectors.
#[derive(Debug, Clone, Copy)]
struct Frame {
    bindings: usize,
    functions: usize,
}

/// The scope stack.
#[derive(Debug, Clone)]
pub struct Environment {
    /// All variable bindings, most recent at the end
    bindings: Vec<Binding>,
    /// All function bindings, most recent at the end
    functions: Vec<FnBinding>,
    /// Where each scope begins; index 0 is the global scope
    frames: Vec<Frame>,
    /// Current function-call depth
    call_depth: usize,
    /// Maximum allowed call depth
    max_call_depth: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment holding only the global scope.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            functions: Vec::new(),
            frames: vec![Frame {
                bindings: 0,
                functions: 0,
            }],
            call_depth: 0,
            max_call_depth: 1000,
        }
    }

    /// Create an environment with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Self::new()
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope entry and exit
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope.
    pub fn push_scope(&mut self) {
        self.frames.push(Frame {
            bindings: self.bindings.len(),
            functions: self.functions.len(),
        });
    }

    /// Exit the current scope, dropping everything declared in it.
    /// The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                self.bindings.truncate(frame.bindings);
                self.functions.truncate(frame.functions);
            }
        }
    }

    /// Number of active scopes (1 = only the global scope).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether only the global scope is active.
    pub fn is_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call depth tracking
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function call; errors when the depth limit is exceeded.
    pub fn enter_call(&mut self) -> Result<()> {
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                depth: self.call_depth,
                max: self.max_call_depth,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Exit a function call.
    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Current function-call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Change the maximum allowed call depth.
    pub fn set_max_call_depth(&mut self, max_depth: usize) {
        self.max_call_depth = max_depth;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Declaration
    // ═══════════════════════════════════════════════════════════════════

    /// Declare a variable in the current scope.
    ///
    /// Re-declaring a name already present in the current scope overwrites
    /// its value; a name from an outer scope is shadowed instead.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let start = self.frames.last().map(|f| f.bindings).unwrap_or(0);
        if let Some(b) = self.bindings[start..].iter_mut().find(|b| b.name == name) {
            b.value = value;
            return;
        }
        self.bindings.push(Binding {
            name,
            value,
            constant: false,
        });
    }

    /// Declare a constant in the current scope.
    pub fn declare_constant(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let start = self.frames.last().map(|f| f.bindings).unwrap_or(0);
        if let Some(b) = self.bindings[start..].iter_mut().find(|b| b.name == name) {
            b.value = value;
            b.constant = true;
            return;
        }
        self.bindings.push(Binding {
            name,
            value,
            constant: true,
        });
    }

    /// Declare a function in the current scope's function table.
    pub fn declare_function(&mut self, name: impl Into<String>, func: Callable) {
        self.functions.push(FnBinding {
            name: name.into(),
            func,
        });
    }

    /// Declare a variable directly in the global scope, regardless of the
    /// current depth. Used by import resolution.
    pub fn declare_global(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let global_end = self
            .frames
            .get(1)
            .map(|f| f.bindings)
            .unwrap_or(self.bindings.len());
        if let Some(b) = self.bindings[..global_end]
            .iter_mut()
            .find(|b| b.name == name)
        {
            b.value = value;
            return;
        }
        self.bindings.insert(
            global_end,
            Binding {
                name,
                value,
                constant: false,
            },
        );
        for frame in &mut self.frames[1..] {
            frame.bindings += 1;
        }
    }

    /// Declare a function directly in the global scope's function table.
    pub fn declare_function_global(&mut self, name: impl Into<String>, func: Callable) {
        let global_end = self
            .frames
            .get(1)
            .map(|f| f.functions)
            .unwrap_or(self.functions.len());
        self.functions.insert(
            global_end,
            FnBinding {
                name: name.into(),
                func,
            },
        );
        for frame in &mut self.frames[1..] {
            frame.functions += 1;
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup (stack-wide, newest scope first)
    // ═══════════════════════════════════════════════════════════════════

    /// Read a variable, scanning the whole scope stack.
    pub fn read(&self, name: &str) -> Result<Value> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedName {
                kind: "variable",
                name: name.to_string(),
                span: None,
            })
    }

    /// Look up a variable without failing.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Whether a variable exists anywhere on the stack.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Whether the nearest binding of `name` is a constant.
    pub fn is_constant(&self, name: &str) -> Option<bool> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| b.constant)
    }

    /// Look up a function, scanning the whole scope stack.
    pub fn lookup_function(&self, name: &str) -> Option<Callable> {
        self.functions
            .iter()
            .rev()
            .find(|f| f.name == name)
            .map(|f| f.func.clone())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment
    // ═══════════════════════════════════════════════════════════════════

    /// Assign to the nearest binding of `name`.
    ///
    /// # Errors
    ///
    /// `UndefinedName` when no binding exists; `ConstAssignment` when the
    /// nearest binding is a constant.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.bindings.iter_mut().rev().find(|b| b.name == name) {
            Some(b) if b.constant => Err(RuntimeError::ConstAssignment {
                name: name.to_string(),
                span: None,
            }),
            Some(b) => {
                b.value = value;
                Ok(())
            }
            None => Err(RuntimeError::UndefinedName {
                kind: "variable",
                name: name.to_string(),
                span: None,
            }),
        }
    }

    /// Replace the nearest binding of `name` without the constant check.
    ///
    /// Only used internally where the language replaces a binding wholesale
    /// (instantiating a struct definition on first field write).
    pub(crate) fn rebind(&mut self, name: &str, value: Value) -> bool {
        if let Some(b) = self.bindings.iter_mut().rev().find(|b| b.name == name) {
            b.value = value;
            true
        } else {
            false
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection (debugger and embedding)
    // ═══════════════════════════════════════════════════════════════════

    /// Bindings of the current (innermost) scope.
    pub fn current_scope_vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        let start = self.frames.last().map(|f| f.bindings).unwrap_or(0);
        self.bindings[start..]
            .iter()
            .map(|b| (b.name.as_str(), &b.value))
    }

    /// Names in every function table, newest scope first.
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.iter().rev().map(|f| f.name.as_str()).collect()
    }

    /// Total number of variable bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no variables are bound at all.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
