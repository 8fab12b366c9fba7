//! Syntax tree node shapes consumed from the parser collaborator
//!
//! The parser — generated or hand-written, any parser producing these
//! shapes will do — hands the engine a [`Program`]. Node kinds correspond
//! 1:1 to the language's statement and expression categories; every node
//! carries its source position for diagnostics.
//!
//! All types are plain data with serde derives so trees can cross a
//! process boundary between the parser and the engine.

use serde::{Deserialize, Serialize};

/// Source position of a node (1-based line, 0-based column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Source line
    pub line: u32,
    /// Column within the line
    pub column: u32,
}

impl Span {
    /// Create a span at the given line and column.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}:{}", self.line, self.column)
    }
}

/// A complete parsed compilation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Stmt>,
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// Literal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// The null literal
    Null,
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Double(f64),
    /// Boolean literal
    Bool(bool),
    /// String literal (already unescaped by the parser)
    Str(String),
}

/// Binary operators, lowest to highest precedence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinOp {
    /// Operator spelling for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        }
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
    /// `!`
    Not,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,
    /// Source position
    pub span: Span,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// A literal constant
    Literal(Literal),
    /// An array literal `[a, b, c]`
    Array(Vec<Expr>),
    /// A bare identifier
    Ident(String),
    /// The `this` keyword
    This,
    /// A binary operation
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// A unary prefix operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Array indexing `target[index]`
    Index {
        /// The array expression
        target: Box<Expr>,
        /// The index expression
        index: Box<Expr>,
    },
    /// Member access `target.name`
    Member {
        /// The object expression
        target: Box<Expr>,
        /// Member name
        name: String,
    },
    /// A call `callee(args...)`
    Call {
        /// The callee expression (identifier, member access, ...)
        callee: Box<Expr>,
        /// Argument expressions
        args: Vec<Expr>,
    },
    /// Instantiation `new Class(args...)`
    New {
        /// Class name
        class: String,
        /// Constructor arguments
        args: Vec<Expr>,
    },
    /// A function reference `&path.to.fn(bound args...)`, used for
    /// callback values handed to timers and event sources
    FunctionRef {
        /// Qualified path to the function
        path: Vec<String>,
        /// Expressions for the pre-bound leading arguments
        captured: Vec<Expr>,
    },
}

impl Expr {
    /// Build an expression from a kind and span.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Null literal with a default span.
    pub fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null), Span::default())
    }

    /// Integer literal with a default span.
    pub fn int(n: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(n)), Span::default())
    }

    /// Double literal with a default span.
    pub fn double(n: f64) -> Self {
        Self::new(ExprKind::Literal(Literal::Double(n)), Span::default())
    }

    /// Boolean literal with a default span.
    pub fn bool(b: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(b)), Span::default())
    }

    /// String literal with a default span.
    pub fn str(s: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::Str(s.into())), Span::default())
    }

    /// Identifier with a default span.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()), Span::default())
    }

    /// Binary operation with a default span.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Span::default(),
        )
    }

    /// Call of a named function with a default span.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(
            ExprKind::Call {
                callee: Box::new(Expr::ident(name)),
                args,
            },
            Span::default(),
        )
    }

    /// Member access with a default span.
    pub fn member(target: Expr, name: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Member {
                target: Box::new(target),
                name: name.into(),
            },
            Span::default(),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    /// What kind of statement this is
    pub kind: StmtKind,
    /// Source position
    pub span: Span,
}

impl Stmt {
    /// Build a statement from a kind and span.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Expression statement with a default span.
    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr), Span::default())
    }

    /// Variable declaration with a default span.
    pub fn var(name: impl Into<String>, init: Expr) -> Self {
        Self::new(
            StmtKind::VarDecl {
                name: name.into(),
                init,
            },
            Span::default(),
        )
    }

    /// Assignment to a plain name with a default span.
    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::new(
            StmtKind::Assign {
                target: AssignTarget::Name {
                    name: name.into(),
                    indices: Vec::new(),
                },
                value,
            },
            Span::default(),
        )
    }

    /// Return statement with a default span.
    pub fn ret(expr: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(expr), Span::default())
    }
}

/// Assignment left-hand sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    /// A plain name, optionally with index chains: `xs[0][1] = ...`
    Name {
        /// Variable name
        name: String,
        /// Index expressions, outermost first (empty for plain names)
        indices: Vec<Expr>,
    },
    /// An object field: `obj.field = ...` or `this.field = ...`
    Field {
        /// The object expression
        object: Expr,
        /// Field name
        field: String,
    },
}

/// One `case` arm of a switch statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// The case expression, compared by equality against the subject
    pub value: Expr,
    /// Statements executed on match
    pub body: Vec<Stmt>,
}

/// One `catch` clause of a try statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Name the error's message is bound to
    pub var: String,
    /// Handler statements
    pub body: Vec<Stmt>,
}

/// A field declaration inside a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Default value expression, evaluated at class-declaration time
    pub default: Option<Expr>,
    /// `private` modifier
    pub private: bool,
    /// `static` modifier
    pub is_static: bool,
    /// `const` modifier
    pub is_const: bool,
}

/// A constructor declaration inside a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtorDecl {
    /// Parameter names
    pub params: Vec<String>,
    /// Constructor body
    pub body: Vec<Stmt>,
    /// `private` modifier
    pub private: bool,
    /// Source position
    pub span: Span,
}

/// A method declaration inside a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// Method body
    pub body: Vec<Stmt>,
    /// `private` modifier
    pub private: bool,
    /// `static` modifier
    pub is_static: bool,
    /// `const` modifier
    pub is_const: bool,
    /// Source position
    pub span: Span,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// Optional superclass name
    pub superclass: Option<String>,
    /// Field declarations
    pub fields: Vec<FieldDecl>,
    /// Constructors (selected by arity at `new` time)
    pub constructors: Vec<CtorDecl>,
    /// Methods and static methods
    pub methods: Vec<MethodDecl>,
}

/// Statement node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// An expression evaluated for its side effects
    Expr(Expr),
    /// `print(expr);`
    Print(Expr),
    /// `var name = expr;`
    VarDecl {
        /// Variable name
        name: String,
        /// Initializer
        init: Expr,
    },
    /// `const name = expr;`
    ConstDecl {
        /// Constant name
        name: String,
        /// Initializer
        init: Expr,
    },
    /// Assignment to a name, element, or field
    Assign {
        /// Left-hand side
        target: AssignTarget,
        /// Right-hand side
        value: Expr,
    },
    /// `function name(params) { ... }`
    FnDecl {
        /// Function name
        name: String,
        /// Parameter names
        params: Vec<String>,
        /// Function body
        body: Vec<Stmt>,
    },
    /// `if` / `else if` / `else`
    If {
        /// Condition of the leading `if`
        cond: Expr,
        /// Statements of the `if` block
        then: Vec<Stmt>,
        /// `else if` clauses in declaration order
        elifs: Vec<(Expr, Vec<Stmt>)>,
        /// Optional `else` block
        else_body: Option<Vec<Stmt>>,
    },
    /// `while (cond) { ... }`
    While {
        /// Loop condition, re-evaluated each iteration
        cond: Expr,
        /// Loop body (runs in the enclosing scope)
        body: Vec<Stmt>,
    },
    /// `do { ... } while (cond);`
    DoWhile {
        /// Loop body, executed at least once
        body: Vec<Stmt>,
        /// Condition checked after each execution
        cond: Expr,
    },
    /// `for (init; cond; update) { ... }`
    For {
        /// Optional init statement, run once in the loop's scope
        init: Option<Box<Stmt>>,
        /// Optional condition (defaults to true)
        cond: Option<Expr>,
        /// Optional update statement, run after each iteration
        update: Option<Box<Stmt>>,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `for (var item : iterable) { ... }`
    ForEach {
        /// Loop variable name
        var: String,
        /// The iterable expression (array or string)
        iterable: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `switch (subject) { case ...: ... default: ... }`
    Switch {
        /// Subject, evaluated once
        subject: Expr,
        /// Case arms in declaration order
        cases: Vec<SwitchCase>,
        /// Optional default arm
        default: Option<Vec<Stmt>>,
    },
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `return expr?;`
    Return(Option<Expr>),
    /// `try { ... } catch (e) { ... } finally { ... }`
    Try {
        /// Protected statements
        body: Vec<Stmt>,
        /// Catch clauses (only the first ever runs)
        catches: Vec<CatchClause>,
        /// Optional finally block, run on every exit path
        finally: Option<Vec<Stmt>>,
    },
    /// `throw expr;`
    Throw(Expr),
    /// A braced statement group (no scope of its own)
    Block(Vec<Stmt>),
    /// A class declaration
    ClassDecl(ClassDecl),
    /// `struct Name { field; ... }`
    StructDecl {
        /// Struct name
        name: String,
        /// Field names (defaults are null)
        fields: Vec<String>,
    },
    /// `enum Name { A, B = expr, ... }`
    EnumDecl {
        /// Enum name
        name: String,
        /// Variants with optional explicit value expressions
        variants: Vec<(String, Option<Expr>)>,
    },
    /// `import lib.ns.symbol;` (trailing `*` imports all symbols)
    Import {
        /// Dotted path segments
        path: Vec<String>,
        /// Whether the path ended in a wildcard
        wildcard: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(3, 7).to_string(), "line 3:7");
    }

    #[test]
    fn test_expr_builders() {
        let e = Expr::binary(BinOp::Add, Expr::int(1), Expr::int(2));
        match e.kind {
            ExprKind::Binary { op, .. } => assert_eq!(op, BinOp::Add),
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn test_binop_symbols() {
        assert_eq!(BinOp::Add.symbol(), "+");
        assert_eq!(BinOp::Ne.symbol(), "!=");
        assert_eq!(BinOp::Rem.symbol(), "%");
    }
}
