//! Statement execution and expression evaluation
//!
//! The executor walks the tree depth-first, dispatching on node kind. Each
//! concern lives in its own submodule; everything is mutually recursive
//! through [`Interpreter`] — method bodies are blocks executed by the same
//! machinery, and the debug controller gates execution at every statement
//! boundary.

pub mod assign;
pub mod binary;
pub mod call;
pub mod control;
pub mod decl;
pub mod literal;
pub mod loops;
pub mod postfix;
pub mod switch;
pub mod try_catch;
pub mod unary;

pub use control::Flow;

use std::io::Write;

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::error::{Result, RuntimeError};
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    /// Execute one statement in the current scope.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        self.position = stmt.span;
        if self.debug.is_enabled() {
            self.debug.check_line(
                stmt.span.line,
                self.env.call_depth(),
                &self.env,
                &self.builtins,
                &mut self.timers,
            );
        }

        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Print(expr) => {
                let value = self.eval_expr(expr)?;
                let _ = writeln!(self.out, "{}", value);
                Ok(Flow::Normal)
            }
            StmtKind::VarDecl { name, init } => {
                let value = self.eval_expr(init)?;
                self.env.declare(name.clone(), value);
                Ok(Flow::Normal)
            }
            StmtKind::ConstDecl { name, init } => {
                let value = self.eval_expr(init)?;
                self.env.declare_constant(name.clone(), value);
                Ok(Flow::Normal)
            }
            StmtKind::Assign { target, value } => {
                self.exec_assign(target, value, stmt.span)?;
                Ok(Flow::Normal)
            }
            StmtKind::FnDecl { name, params, body } => {
                self.exec_fn_decl(name, params, body);
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then,
                elifs,
                else_body,
            } => self.exec_if(cond, then, elifs, else_body.as_deref()),
            StmtKind::While { cond, body } => self.exec_while(cond, body),
            StmtKind::DoWhile { body, cond } => self.exec_do_while(body, cond),
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => self.exec_for(init.as_deref(), cond.as_ref(), update.as_deref(), body),
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => self.exec_foreach(var, iterable, body),
            StmtKind::Switch {
                subject,
                cases,
                default,
            } => self.exec_switch(subject, cases, default.as_deref()),
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(e) => self.eval_expr(e)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Try {
                body,
                catches,
                finally,
            } => self.exec_try(body, catches, finally.as_deref()),
            StmtKind::Throw(expr) => self.exec_throw(expr, stmt.span),
            StmtKind::Block(stmts) => self.exec_block(stmts),
            StmtKind::ClassDecl(decl) => {
                self.exec_class_decl(decl, stmt.span)?;
                Ok(Flow::Normal)
            }
            StmtKind::StructDecl { name, fields } => {
                self.exec_struct_decl(name, fields);
                Ok(Flow::Normal)
            }
            StmtKind::EnumDecl { name, variants } => {
                self.exec_enum_decl(name, variants)?;
                Ok(Flow::Normal)
            }
            StmtKind::Import { path, wildcard } => {
                self.exec_import(path, *wildcard, stmt.span)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Execute statements in the current scope, stopping at the first
    /// non-normal flow.
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            let flow = self.exec_stmt(stmt)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_if(
        &mut self,
        cond: &Expr,
        then: &[Stmt],
        elifs: &[(Expr, Vec<Stmt>)],
        else_body: Option<&[Stmt]>,
    ) -> Result<Flow> {
        if self.eval_expr(cond)?.is_truthy() {
            return self.exec_block(then);
        }
        for (elif_cond, elif_body) in elifs {
            if self.eval_expr(elif_cond)?.is_truthy() {
                return self.exec_block(elif_body);
            }
        }
        match else_body {
            Some(body) => self.exec_block(body),
            None => Ok(Flow::Normal),
        }
    }

    /// Evaluate one expression in the current scope.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal::eval_literal(lit)),
            ExprKind::Array(elements) => self.eval_array_literal(elements),
            ExprKind::Ident(name) => self
                .env
                .read(name)
                .map_err(|e| e.with_span(expr.span)),
            ExprKind::This => self.read_this(expr.span),
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, expr.span),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
            ExprKind::Index { target, index } => self.eval_index(target, index, expr.span),
            ExprKind::Member { target, name } => self.eval_member(target, name, expr.span),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),
            ExprKind::New { class, args } => self.construct(class, args, expr.span),
            ExprKind::FunctionRef { path, captured } => {
                self.eval_function_ref(path, captured, expr.span)
            }
        }
    }

    /// Resolve `this` against the live scope stack.
    fn read_this(&self, span: crate::ast::Span) -> Result<Value> {
        self.env.get("this").cloned().ok_or_else(|| {
            RuntimeError::TypeMismatch {
                message: "'this' can only be used within a class method or constructor"
                    .to_string(),
                span: Some(span),
            }
        })
    }
}
