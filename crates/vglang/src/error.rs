//! Runtime error taxonomy
//!
//! Every runtime failure carries a message and, where known, the source
//! position. `Display` is the bare message — that string is what a `catch`
//! clause binds — while [`crate::report`] adds location and color for
//! top-level reporting.

use thiserror::Error;

use crate::ast::Span;

/// Errors raised during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// An undefined variable, function, namespace, or symbol was referenced
    #[error("{kind} '{name}' is not defined")]
    UndefinedName {
        /// What was being looked up ("variable", "function", ...)
        kind: &'static str,
        /// The missing name
        name: String,
        /// Where the reference occurred
        span: Option<Span>,
    },

    /// Assignment to a name declared `const`
    #[error("cannot reassign constant '{name}'")]
    ConstAssignment {
        /// The constant's name
        name: String,
        /// Where the assignment occurred
        span: Option<Span>,
    },

    /// A call supplied the wrong number of arguments
    #[error("{}", argument_count_message(.name, .expected, .actual))]
    ArgumentCount {
        /// Callee name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
        /// Call site
        span: Option<Span>,
    },

    /// A field name absent from a class's inheritance chain
    #[error("field '{field}' does not exist in class '{class}'")]
    FieldNotFound {
        /// The class name
        class: String,
        /// The missing field
        field: String,
        /// Access site
        span: Option<Span>,
    },

    /// Write to a `const` field that already holds a value
    #[error("cannot modify const field '{field}' in class '{class}'")]
    ConstField {
        /// The class name
        class: String,
        /// The const field
        field: String,
        /// Assignment site
        span: Option<Span>,
    },

    /// A method name absent from a class's inheritance chain
    #[error("method '{method}' not found in class '{class}'")]
    MethodNotFound {
        /// The class name
        class: String,
        /// The missing method
        method: String,
        /// Call site
        span: Option<Span>,
    },

    /// No constructor matched the argument count
    #[error("no constructor found for class '{class}' with {arity} arguments")]
    ConstructorNotFound {
        /// The class name
        class: String,
        /// The argument count that failed to match
        arity: usize,
        /// The `new` expression's site
        span: Option<Span>,
    },

    /// Array index outside `[0, len)`
    #[error("array index out of bounds: index {index} exceeds array length {len}")]
    IndexOutOfBounds {
        /// The offending index
        index: i64,
        /// The array's length
        len: usize,
        /// Indexing site
        span: Option<Span>,
    },

    /// Division or remainder by zero on numeric operands
    #[error("division by zero")]
    DivisionByZero {
        /// Operation site
        span: Option<Span>,
    },

    /// Operand types unsuitable for an operation
    #[error("{message}")]
    TypeMismatch {
        /// Human-readable description
        message: String,
        /// Operation site
        span: Option<Span>,
    },

    /// An error raised by a `throw` statement
    #[error("{message}")]
    UserThrown {
        /// The thrown expression's string form
        message: String,
        /// The `throw` site
        span: Option<Span>,
    },

    /// Access to a private member from outside its class
    #[error("{member_kind} '{name}' is private and cannot be accessed")]
    PrivateAccess {
        /// "field", "method", "static method", or "constructor"
        member_kind: &'static str,
        /// Member name
        name: String,
        /// Access site
        span: Option<Span>,
    },

    /// Call depth exceeded the configured maximum
    #[error("maximum call depth exceeded ({max})")]
    StackOverflow {
        /// Depth at the failing call
        depth: usize,
        /// Configured limit
        max: usize,
    },

    /// A syntax error forwarded from the parser collaborator
    #[error("syntax error: {message}")]
    Syntax {
        /// Parser diagnostic
        message: String,
        /// Position reported by the parser
        span: Option<Span>,
    },
}

fn argument_count_message(name: &str, expected: &usize, actual: &usize) -> String {
    let (expected, actual) = (*expected, *actual);
    let diff = if actual < expected {
        format!("{} too few", expected - actual)
    } else {
        format!("{} too many", actual - expected)
    };
    format!(
        "function '{}' expects {} argument{}, got {} ({})",
        name,
        expected,
        if expected == 1 { "" } else { "s" },
        actual,
        diff
    )
}

impl RuntimeError {
    /// The source position attached to this error, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::UndefinedName { span, .. }
            | RuntimeError::ConstAssignment { span, .. }
            | RuntimeError::ArgumentCount { span, .. }
            | RuntimeError::FieldNotFound { span, .. }
            | RuntimeError::ConstField { span, .. }
            | RuntimeError::MethodNotFound { span, .. }
            | RuntimeError::ConstructorNotFound { span, .. }
            | RuntimeError::IndexOutOfBounds { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::UserThrown { span, .. }
            | RuntimeError::PrivateAccess { span, .. }
            | RuntimeError::Syntax { span, .. } => *span,
            RuntimeError::StackOverflow { .. } => None,
        }
    }

    /// Short category label used by the top-level reporter.
    pub fn kind_label(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedName { .. } => "Name Error",
            RuntimeError::ConstAssignment { .. } => "Const Assignment Error",
            RuntimeError::ArgumentCount { .. } => "Argument Count Error",
            RuntimeError::FieldNotFound { .. } => "Field Error",
            RuntimeError::ConstField { .. } => "Const Field Error",
            RuntimeError::MethodNotFound { .. } => "Method Error",
            RuntimeError::ConstructorNotFound { .. } => "Constructor Error",
            RuntimeError::IndexOutOfBounds { .. } => "Index Error",
            RuntimeError::DivisionByZero { .. } => "Division By Zero",
            RuntimeError::TypeMismatch { .. } => "Type Error",
            RuntimeError::UserThrown { .. } => "Uncaught Error",
            RuntimeError::PrivateAccess { .. } => "Access Error",
            RuntimeError::StackOverflow { .. } => "Stack Overflow",
            RuntimeError::Syntax { .. } => "Syntax Error",
        }
    }

    /// Attach a span if the error does not already carry one.
    pub fn with_span(mut self, at: Span) -> Self {
        match &mut self {
            RuntimeError::UndefinedName { span, .. }
            | RuntimeError::ConstAssignment { span, .. }
            | RuntimeError::ArgumentCount { span, .. }
            | RuntimeError::FieldNotFound { span, .. }
            | RuntimeError::ConstField { span, .. }
            | RuntimeError::MethodNotFound { span, .. }
            | RuntimeError::ConstructorNotFound { span, .. }
            | RuntimeError::IndexOutOfBounds { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::UserThrown { span, .. }
            | RuntimeError::PrivateAccess { span, .. }
            | RuntimeError::Syntax { span, .. } => {
                if span.is_none() {
                    *span = Some(at);
                }
            }
            RuntimeError::StackOverflow { .. } => {}
        }
        self
    }

    /// Convenience constructor for type errors.
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        RuntimeError::TypeMismatch {
            message: message.into(),
            span: None,
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
