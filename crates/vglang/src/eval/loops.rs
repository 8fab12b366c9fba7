//! Loop statement execution
//!
//! `while` and `do-while` bodies run in the enclosing scope; `for` pushes
//! one scope for the whole statement (init, condition, update, and body),
//! popped on every exit including `break`; `for-each` scopes its loop
//! variable. `continue` resumes at the next iteration test — in a `for`
//! loop the update still runs — and `break` exits the loop entirely.

use crate::ast::{Expr, Stmt};
use crate::error::{Result, RuntimeError};
use crate::eval::Flow;
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn exec_while(&mut self, cond: &Expr, body: &[Stmt]) -> Result<Flow> {
        while self.eval_expr(cond)?.is_truthy() {
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_do_while(&mut self, body: &[Stmt], cond: &Expr) -> Result<Flow> {
        loop {
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
            if !self.eval_expr(cond)?.is_truthy() {
                break;
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        update: Option<&Stmt>,
        body: &[Stmt],
    ) -> Result<Flow> {
        self.env.push_scope();
        let result = self.exec_for_inner(init, cond, update, body);
        self.env.pop_scope();
        result
    }

    fn exec_for_inner(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        update: Option<&Stmt>,
        body: &[Stmt],
    ) -> Result<Flow> {
        if let Some(init) = init {
            self.exec_stmt(init)?;
        }
        loop {
            if let Some(cond) = cond {
                if !self.eval_expr(cond)?.is_truthy() {
                    break;
                }
            }
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
            if let Some(update) = update {
                self.exec_stmt(update)?;
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_foreach(
        &mut self,
        var: &str,
        iterable: &Expr,
        body: &[Stmt],
    ) -> Result<Flow> {
        let span = iterable.span;
        let items = match self.eval_expr(iterable)? {
            Value::Array(elements) => elements.borrow().clone(),
            Value::Str(s) => s
                .chars()
                .map(|c| Value::string(c.to_string()))
                .collect(),
            other => {
                return Err(RuntimeError::TypeMismatch {
                    message: format!(
                        "for-each loop requires an array or string, got {}",
                        other.type_name()
                    ),
                    span: Some(span),
                })
            }
        };

        self.env.push_scope();
        let result = self.exec_foreach_inner(var, items, body);
        self.env.pop_scope();
        result
    }

    fn exec_foreach_inner(
        &mut self,
        var: &str,
        items: Vec<Value>,
        body: &[Stmt],
    ) -> Result<Flow> {
        for item in items {
            self.env.declare(var.to_string(), item);
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }
}
