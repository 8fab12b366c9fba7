//! Switch statement execution
//!
//! The subject is evaluated once; case expressions are compared by value
//! equality in declaration order. Only the first matching case's
//! statements execute (no implicit fallthrough); `break` exits the switch,
//! other signals propagate. `default` runs when no case matched.

use crate::ast::{Expr, Stmt, SwitchCase};
use crate::error::Result;
use crate::eval::Flow;
use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn exec_switch(
        &mut self,
        subject: &Expr,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> Result<Flow> {
        let subject = self.eval_expr(subject)?;

        for case in cases {
            let case_value = self.eval_expr(&case.value)?;
            if subject == case_value {
                return absorb_break(self.exec_block(&case.body)?);
            }
        }

        match default {
            Some(body) => absorb_break(self.exec_block(body)?),
            None => Ok(Flow::Normal),
        }
    }
}

fn absorb_break(flow: Flow) -> Result<Flow> {
    match flow {
        Flow::Break => Ok(Flow::Normal),
        other => Ok(other),
    }
}
