use std::io::Write;

use crate::{
    ast::{Block, Expression, Statement},
    interpreter::evaluator::core::{Context, EvalResult, Flow},
};

impl Context<'_> {
    /// Evaluates a block, statement by statement.
    ///
    /// The block stops at the first statement that yields and passes that
    /// result up. This is how `return` leaves nested `if` and `while`
    /// bodies. Unreferenced objects are swept after every statement that
    /// yields nothing.
    ///
    /// # Returns
    /// [`Flow::Yield`] with the first yielded result, or [`Flow::Continue`]
    /// if every statement ran to completion.
    pub fn eval_block(&mut self, block: &Block) -> EvalResult<Flow> {
        for statement in &block.statements {
            let flow = self.eval_statement(statement)?;
            if flow != Flow::Continue {
                return Ok(flow);
            }
            self.heap.sweep();
        }
        Ok(Flow::Continue)
    }

    /// Evaluates a single statement.
    ///
    /// - An expression statement yields its value if it has one, unless the
    ///   expression is an assignment.
    /// - `print` writes the value and yields nothing.
    /// - `return` always yields, even an unbound value.
    /// - `if` and `while` yield only what their bodies yield.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Expression(expression) => {
                let slot = self.eval_expression(expression)?;
                match self.load(slot) {
                    Some(object) if !expression.is_assignment() => Ok(Flow::Yield(Some(object))),
                    _ => Ok(Flow::Continue),
                }
            },
            Statement::Print(expression) => {
                let slot = self.eval_expression(expression)?;
                let object = self.load(slot);
                write!(self.output, "{}", self.heap.render(object))?;
                Ok(Flow::Continue)
            },
            Statement::Return(expression) => {
                let slot = self.eval_expression(expression)?;
                Ok(Flow::Yield(self.load(slot)))
            },
            Statement::If { condition,
                            then_block,
                            else_block, } => {
                if self.eval_condition(condition)? {
                    self.eval_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.eval_block(else_block)
                } else {
                    Ok(Flow::Continue)
                }
            },
            Statement::While { condition, body } => {
                while self.eval_condition(condition)? {
                    let flow = self.eval_block(body)?;
                    if flow != Flow::Continue {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Continue)
            },
        }
    }

    fn eval_condition(&mut self, condition: &Expression) -> EvalResult<bool> {
        let slot = self.eval_expression(condition)?;
        Ok(self.is_truthy(self.load(slot)))
    }
}
