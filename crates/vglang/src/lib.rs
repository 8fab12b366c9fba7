//! # vglang
//!
//! A tree-walking evaluation engine for the VG scripting language.
//!
//! VG is dynamically typed: values carry their type at runtime, name
//! resolution scans the live scope stack, and classes resolve members
//! through a single-inheritance chain. This crate is the execution half of
//! the language — it consumes syntax trees produced by an external parser
//! and walks them directly, without bytecode or compilation.
//!
//! ## Architecture
//!
//! - **`ast`**: the node shapes the parser collaborator hands over
//! - **`environment`**: the scope stack (one persistent global scope,
//!   stack-wide dynamic name resolution)
//! - **`classes`**: class definitions, inheritance, instances
//! - **`eval`**: statement executor and expression evaluator
//! - **`debug`**: breakpoint/stepping controller gating the evaluator
//! - **`interpreter`**: the owning facade tying everything together
//!
//! Name resolution is intentionally *dynamic*, not lexical: a called
//! function can observe its caller's locals. This is the language's
//! defined behavior and is load-bearing for existing programs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod classes;
pub mod debug;
pub mod environment;
pub mod error;
pub mod eval;
pub mod interpreter;
pub mod modules;
pub mod report;
pub mod value;

// Re-export main types
pub use ast::{BinOp, Expr, ExprKind, Program, Span, Stmt, StmtKind, UnaryOp};
pub use debug::{DebugController, PausableTimer, TimerRegistry};
pub use environment::Environment;
pub use error::{Result, RuntimeError};
pub use eval::Flow;
pub use interpreter::Interpreter;
pub use value::{Builtin, Callable, Function, FunctionReference, Value};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
