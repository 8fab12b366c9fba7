//! try/catch/finally and throw
//!
//! Any runtime error raised in the try block is handled by the **first**
//! declared catch clause, whatever the error's kind — the grammar carries
//! no type tags on catch clauses, so no selection exists. The clause runs
//! in a fresh scope with the error's message string bound to its variable.
//! Without a catch clause the error re-propagates. `finally` runs on every
//! exit path (normal completion, caught, re-propagating, and control-flow
//! signals crossing the statement); an error or signal from the finally
//! block itself takes precedence over the protected block's outcome.

use crate::ast::{CatchClause, Expr, Span, Stmt};
use crate::error::{Result, RuntimeError};
use crate::eval::Flow;
use crate::interpreter::Interpreter;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn exec_try(
        &mut self,
        body: &[Stmt],
        catches: &[CatchClause],
        finally: Option<&[Stmt]>,
    ) -> Result<Flow> {
        let outcome = match self.exec_block(body) {
            Ok(flow) => Ok(flow),
            Err(err) => match catches.first() {
                Some(clause) => self.run_catch(clause, &err),
                None => Err(err),
            },
        };

        match finally {
            Some(fin) => match self.exec_block(fin)? {
                Flow::Normal => outcome,
                interrupting => Ok(interrupting),
            },
            None => outcome,
        }
    }

    fn run_catch(&mut self, clause: &CatchClause, err: &RuntimeError) -> Result<Flow> {
        self.env.push_scope();
        self.env
            .declare(clause.var.clone(), Value::string(err.to_string()));
        let result = self.exec_block(&clause.body);
        self.env.pop_scope();
        result
    }

    pub(crate) fn exec_throw(&mut self, expr: &Expr, span: Span) -> Result<Flow> {
        let value = self.eval_expr(expr)?;
        Err(RuntimeError::UserThrown {
            message: value.to_string(),
            span: Some(span),
        })
    }
}
