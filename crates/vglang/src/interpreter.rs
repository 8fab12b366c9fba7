//! The interpreter: one value owning all evaluation state
//!
//! The global scope, the module registry, the timer registry, and debug
//! state all live in fields of [`Interpreter`] rather than in statics, so
//! several instances can coexist (test harnesses, embedding hosts) without
//! cross-talk.

use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{Expr, Program, Span};
use crate::classes::ClassArena;
use crate::debug::{DebugController, PausableTimer, TimerRegistry};
use crate::environment::Environment;
use crate::error::{Result, RuntimeError};
use crate::eval::Flow;
use crate::modules::{Library, LibraryDecl, ModuleRegistry, Namespace, NamespaceDecl};
use crate::report;
use crate::value::{Builtin, Callable, Function, Value};

/// A VG interpreter instance.
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) classes: ClassArena,
    pub(crate) modules: ModuleRegistry,
    pub(crate) builtins: IndexMap<String, Builtin>,
    pub(crate) debug: DebugController,
    pub(crate) timers: TimerRegistry,
    pub(crate) position: Span,
    pub(crate) out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter writing program output to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// Create an interpreter writing program output to the given sink.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut interp = Self {
            env: Environment::new(),
            classes: ClassArena::new(),
            modules: ModuleRegistry::new(),
            builtins: IndexMap::new(),
            debug: DebugController::new(),
            timers: TimerRegistry::new(),
            position: Span::default(),
            out,
        };
        interp.env.declare_constant("true", Value::Bool(true));
        interp.env.declare_constant("false", Value::Bool(false));
        interp.register_default_builtins();
        interp
    }

    fn register_default_builtins(&mut self) {
        self.register_builtin(Builtin::new("instanceOf", 2, |interp, args| {
            let mut args = args.into_iter();
            let target = args.next().unwrap_or(Value::Null);
            let class_name = match args.next() {
                Some(Value::Str(s)) => s,
                other => {
                    return Err(RuntimeError::type_mismatch(format!(
                        "instanceOf expects a class name string, got {}",
                        other.map(|v| v.type_name().to_string()).unwrap_or_default()
                    )))
                }
            };
            let result = match target {
                Value::Instance(inst) => interp.classes.instance_of(inst.class(), &class_name),
                _ => false,
            };
            Ok(Value::Bool(result))
        }));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Program execution
    // ═══════════════════════════════════════════════════════════════════

    /// Execute a program.
    ///
    /// A top-level `return` stops execution; a stray `break`/`continue` is
    /// a runtime error.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        match self.exec_block(&program.body)? {
            Flow::Normal | Flow::Return(_) => Ok(()),
            Flow::Break => Err(RuntimeError::type_mismatch("'break' outside of a loop")),
            Flow::Continue => Err(RuntimeError::type_mismatch("'continue' outside of a loop")),
        }
    }

    /// Execute a program, reporting any error to stderr with file/line
    /// context. The interpreter stays usable afterwards.
    pub fn run_and_report(&mut self, program: &Program, file: Option<&str>) -> bool {
        match self.run(program) {
            Ok(()) => true,
            Err(err) => {
                report::print_error(&err, file);
                false
            }
        }
    }

    /// Evaluate a single expression in the current scope.
    pub fn eval_expression(&mut self, expr: &Expr) -> Result<Value> {
        self.eval_expr(expr)
    }

    /// Execute a statement slice in the current scope.
    pub fn execute(&mut self, stmts: &[crate::ast::Stmt]) -> Result<Flow> {
        self.exec_block(stmts)
    }

    /// Read a variable from the scope stack (embedding/test hook).
    pub fn read_variable(&self, name: &str) -> Result<Value> {
        self.env.read(name)
    }

    /// The environment (scope stack).
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Change the recursion limit (default 1000 calls).
    pub fn set_max_call_depth(&mut self, max_depth: usize) {
        self.env.set_max_call_depth(max_depth);
    }

    /// The class arena.
    pub fn class_arena(&self) -> &ClassArena {
        &self.classes
    }

    /// Current source position, updated at every statement boundary.
    pub fn position(&self) -> Span {
        self.position
    }

    // ═══════════════════════════════════════════════════════════════════
    // Host integration
    // ═══════════════════════════════════════════════════════════════════

    /// Register a built-in function.
    ///
    /// The builtin enters the global function table and is also bound as a
    /// value, so it can be stored and passed around like user functions.
    pub fn register_builtin(&mut self, builtin: Builtin) {
        let name = builtin.name.clone();
        self.env
            .declare_function_global(name.clone(), Callable::Builtin(builtin.clone()));
        self.env
            .declare_global(name.clone(), Value::Builtin(builtin.clone()));
        self.builtins.insert(name, builtin);
    }

    /// Register a timer so the debugger can pause and resume it.
    pub fn register_timer(&mut self, timer: Rc<dyn PausableTimer>) {
        self.timers.register(timer);
    }

    /// Remove a previously registered timer.
    pub fn unregister_timer(&mut self, timer: &Rc<dyn PausableTimer>) {
        self.timers.unregister(timer);
    }

    /// The debug/step controller.
    pub fn debugger(&mut self) -> &mut DebugController {
        &mut self.debug
    }

    // ═══════════════════════════════════════════════════════════════════
    // Library registration and qualified resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Register a pre-parsed library declaration.
    ///
    /// Variable and constant initializers are evaluated with the normal
    /// expression evaluator at registration time.
    pub fn register_library(&mut self, decl: &LibraryDecl) -> Result<()> {
        let mut library = Library {
            name: decl.name.clone(),
            ..Default::default()
        };
        for ns_decl in &decl.namespaces {
            let ns = self.build_namespace(ns_decl)?;
            library.namespaces.insert(ns.name.clone(), Rc::new(ns));
        }
        self.modules.add_library(library);
        Ok(())
    }

    fn build_namespace(&mut self, decl: &NamespaceDecl) -> Result<Namespace> {
        let mut ns = Namespace {
            name: decl.name.clone(),
            ..Default::default()
        };
        for f in &decl.functions {
            let func = Rc::new(Function::new(
                f.name.clone(),
                f.params.clone(),
                f.body.clone(),
            ));
            ns.functions.insert(f.name.clone(), func.clone());
            ns.symbols.insert(f.name.clone(), Value::Function(func));
        }
        for v in &decl.variables {
            let value = self.eval_expr(&v.init)?;
            ns.symbols.insert(v.name.clone(), value);
        }
        for c in &decl.constants {
            let value = self.eval_expr(&c.init)?;
            ns.symbols.insert(c.name.clone(), value);
        }
        for child in &decl.children {
            let built = self.build_namespace(child)?;
            ns.children.insert(built.name.clone(), Rc::new(built));
        }
        Ok(ns)
    }

    /// Resolve a qualified function path: a bare name against the function
    /// tables, or `lib.namespace(...).function` through the registry.
    pub fn resolve_function_path(&self, path: &[String]) -> Result<Rc<Function>> {
        match path {
            [] => Err(RuntimeError::type_mismatch("empty function path")),
            [name] => match self.env.lookup_function(name) {
                Some(Callable::Function(f)) => Ok(f),
                _ => Err(RuntimeError::UndefinedName {
                    kind: "function",
                    name: name.clone(),
                    span: None,
                }),
            },
            [_lib, _ns] => Err(RuntimeError::type_mismatch(format!(
                "invalid function path: {}",
                path.join(".")
            ))),
            _ => {
                let lib = self.modules.library(&path[0]).ok_or_else(|| {
                    RuntimeError::UndefinedName {
                        kind: "library",
                        name: path[0].clone(),
                        span: None,
                    }
                })?;
                let ns = lib
                    .namespace(&path[1])
                    .ok_or_else(|| RuntimeError::UndefinedName {
                        kind: "namespace",
                        name: path[1].clone(),
                        span: None,
                    })?;
                let ns = ns
                    .nested(&path[2..path.len() - 1])
                    .ok_or_else(|| RuntimeError::UndefinedName {
                        kind: "namespace",
                        name: path[..path.len() - 1].join("."),
                        span: None,
                    })?;
                let fn_name = &path[path.len() - 1];
                if let Some(f) = ns.function(fn_name) {
                    return Ok(f);
                }
                if let Some(Value::Function(f)) = ns.symbol(fn_name) {
                    return Ok(f.clone());
                }
                Err(RuntimeError::UndefinedName {
                    kind: "function",
                    name: path.join("."),
                    span: None,
                })
            }
        }
    }
}
