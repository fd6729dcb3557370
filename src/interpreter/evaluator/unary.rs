use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Slot},
        runtime::ObjectData,
    },
};

impl Context<'_> {
    /// Applies a prefix operator to an evaluated operand.
    ///
    /// `Negate` works on numbers only and wraps at the integer boundary, so
    /// negating the smallest integer leaves it unchanged.
    ///
    /// # Errors
    /// - `UnboundOperand` if the operand is unbound.
    /// - `TypeError` if it is not a number.
    pub fn eval_unary(&mut self, op: UnaryOperator, operand: Slot, line: usize) -> EvalResult<Slot> {
        let Some(object) = self.load(operand) else {
            return Err(RuntimeError::UnboundOperand { operator: "-".to_string(),
                                                      line });
        };

        match (op, self.heap.data(object)) {
            (UnaryOperator::Negate, ObjectData::Number(n)) => {
                let negated = n.wrapping_neg();
                Ok(Slot::Temporary(Some(self.heap.create_object(ObjectData::Number(negated)))))
            },
            (UnaryOperator::Negate, other) => {
                Err(RuntimeError::TypeError { details: format!("cannot negate a {}",
                                                               other.kind_name()),
                                              line })
            },
        }
    }
}
