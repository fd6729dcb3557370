use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Slot},
        runtime::ObjectData,
    },
};

impl Context<'_> {
    /// Combines the accumulator with the next operand.
    ///
    /// - `=` rebinds the left slot to the right operand's object and
    ///   evaluates to the left slot, so chained assignments see the new
    ///   binding.
    /// - `and` and `or` test truthiness of both operands and produce 1 or 0.
    ///   Both operands have already been evaluated.
    /// - `==` and `!=` treat an object as equal to itself whatever its kind.
    /// - Everything else is delegated to [`Context::eval_binary`].
    ///
    /// # Errors
    /// - `InvalidAssignment` if the left side of `=` is a temporary.
    /// - `UnboundOperand` if an arithmetic or comparison operand is unbound.
    /// - Errors from [`Context::eval_binary`].
    pub fn apply_operator(&mut self,
                          left: Slot,
                          right: Slot,
                          op: BinaryOperator,
                          line: usize)
                          -> EvalResult<Slot> {
        use BinaryOperator::{And, Assign, Dot, Equal, NotEqual, Or};

        if op == Assign {
            return self.assign(left, right, line);
        }

        let (left, right) = (self.load(left), self.load(right));
        let data = match op {
            And => ObjectData::Number(i64::from(self.is_truthy(left) && self.is_truthy(right))),
            Or => ObjectData::Number(i64::from(self.is_truthy(left) || self.is_truthy(right))),
            Dot => {
                return Err(RuntimeError::TypeError { details: "'.' must follow a variable name"
                                                                  .to_string(),
                                                     line });
            },
            _ => {
                let (Some(left), Some(right)) = (left, right) else {
                    return Err(RuntimeError::UnboundOperand { operator: op.to_string(),
                                                              line });
                };
                if left == right && matches!(op, Equal | NotEqual) {
                    ObjectData::Number(i64::from(op == Equal))
                } else {
                    Self::eval_binary(op, self.heap.data(left), self.heap.data(right), line)?
                }
            },
        };

        Ok(Slot::Temporary(Some(self.heap.create_object(data))))
    }

    /// Evaluates an arithmetic or comparison operator on two payloads.
    ///
    /// | operator            | operands           | result                      |
    /// |---------------------|--------------------|-----------------------------|
    /// | `+ - * /`           | number, number     | number, wrapping            |
    /// | `+`                 | string, string     | concatenation               |
    /// | `+`                 | string, number     | string with decimal appended|
    /// | `> >= < <=`         | number, number     | 1 or 0                      |
    /// | `== !=`             | number or string   | 1 or 0                      |
    /// | `== !=`             | different kinds    | unequal                     |
    ///
    /// Comparisons produce numbers; there is no boolean kind.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` by zero.
    /// - `TypeError` for any other combination.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, runtime::ObjectData},
    /// };
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add,
    ///                                &ObjectData::Text("x".to_string()),
    ///                                &ObjectData::Number(1),
    ///                                1).unwrap();
    /// assert_eq!(sum, ObjectData::Text("x1".to_string()));
    ///
    /// let less = Context::eval_binary(BinaryOperator::Less,
    ///                                 &ObjectData::Number(1),
    ///                                 &ObjectData::Number(2),
    ///                                 1).unwrap();
    /// assert_eq!(less, ObjectData::Number(1));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &ObjectData,
                       right: &ObjectData,
                       line: usize)
                       -> EvalResult<ObjectData> {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };
        use ObjectData::{Number, Text};

        let result = match (op, left, right) {
            (Add, Number(a), Number(b)) => Number(a.wrapping_add(*b)),
            (Sub, Number(a), Number(b)) => Number(a.wrapping_sub(*b)),
            (Mul, Number(a), Number(b)) => Number(a.wrapping_mul(*b)),
            (Div, Number(_), Number(0)) => return Err(RuntimeError::DivisionByZero { line }),
            (Div, Number(a), Number(b)) => Number(a.wrapping_div(*b)),
            (Add, Text(a), Text(b)) => Text(format!("{a}{b}")),
            (Add, Text(a), Number(b)) => Text(format!("{a}{b}")),
            (Greater, Number(a), Number(b)) => Number(i64::from(a > b)),
            (GreaterEqual, Number(a), Number(b)) => Number(i64::from(a >= b)),
            (Less, Number(a), Number(b)) => Number(i64::from(a < b)),
            (LessEqual, Number(a), Number(b)) => Number(i64::from(a <= b)),
            (Equal, _, _) => Number(i64::from(payloads_equal(left, right))),
            (NotEqual, _, _) => Number(i64::from(!payloads_equal(left, right))),
            _ => {
                return Err(RuntimeError::TypeError { details: format!("cannot apply '{op}' to \
                                                                       {} and {}",
                                                                      left.kind_name(),
                                                                      right.kind_name()),
                                                     line });
            },
        };

        Ok(result)
    }

    fn assign(&mut self, left: Slot, right: Slot, line: usize) -> EvalResult<Slot> {
        let value = self.load(right);
        match left {
            Slot::Variable(variable) => self.heap.bind(variable, value),
            Slot::Element { list, index } => {
                let Some(value) = value else {
                    return Err(RuntimeError::UnboundOperand { operator: "=".to_string(),
                                                              line });
                };
                self.heap.set_element(list, index, value);
            },
            Slot::Temporary(_) => return Err(RuntimeError::InvalidAssignment { line }),
        }
        Ok(left)
    }
}

/// Value equality of numbers and strings. Objects of other kinds are only
/// equal to themselves, which the caller checks by handle.
fn payloads_equal(left: &ObjectData, right: &ObjectData) -> bool {
    match (left, right) {
        (ObjectData::Number(a), ObjectData::Number(b)) => a == b,
        (ObjectData::Text(a), ObjectData::Text(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::runtime::ObjectData::{Base, List, Number, Text};

    fn binary(op: BinaryOperator, left: &ObjectData, right: &ObjectData) -> ObjectData {
        Context::eval_binary(op, left, right, 1).unwrap()
    }

    fn text(s: &str) -> ObjectData {
        Text(s.to_string())
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(binary(BinaryOperator::Add, &Number(i64::MAX), &Number(1)),
                   Number(i64::MIN));
        assert_eq!(binary(BinaryOperator::Div, &Number(i64::MIN), &Number(-1)),
                   Number(i64::MIN));
        assert_eq!(binary(BinaryOperator::Div, &Number(-7), &Number(2)), Number(-3));
    }

    #[test]
    fn division_by_zero() {
        let error = Context::eval_binary(BinaryOperator::Div, &Number(1), &Number(0), 4);

        assert!(matches!(error, Err(RuntimeError::DivisionByZero { line: 4 })));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(binary(BinaryOperator::Add, &text("a"), &text("b")), text("ab"));
        assert_eq!(binary(BinaryOperator::Add, &text("n="), &Number(-4)), text("n=-4"));
    }

    #[test]
    fn number_plus_string_is_a_type_error() {
        let error = Context::eval_binary(BinaryOperator::Add, &Number(1), &text("x"), 2);

        assert!(matches!(error, Err(RuntimeError::TypeError { line: 2, .. })));
    }

    #[test]
    fn equality_across_kinds() {
        assert_eq!(binary(BinaryOperator::Equal, &text("a"), &text("a")), Number(1));
        assert_eq!(binary(BinaryOperator::NotEqual, &text("a"), &text("b")), Number(1));
        assert_eq!(binary(BinaryOperator::Equal, &Number(1), &text("1")), Number(0));
        assert_eq!(binary(BinaryOperator::NotEqual, &Base, &List(vec![])), Number(1));
    }

    #[test]
    fn comparisons_are_numeric_only() {
        assert_eq!(binary(BinaryOperator::GreaterEqual, &Number(2), &Number(2)), Number(1));
        assert_eq!(binary(BinaryOperator::Less, &Number(3), &Number(2)), Number(0));
        assert!(Context::eval_binary(BinaryOperator::Less, &text("a"), &text("b"), 1).is_err());
    }
}
