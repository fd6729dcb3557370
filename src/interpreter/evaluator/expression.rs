use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expression, UnaryOperator, Value},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Slot},
        runtime::{Closure, ObjectData, ObjectId},
    },
};

impl Context<'_> {
    /// Evaluates a flat expression strictly left to right.
    ///
    /// The first operand becomes the accumulator; each operator then
    /// combines the accumulator with the next operand. The accumulator stays
    /// pinned until the operator has consumed it, since evaluating the next
    /// operand may run arbitrary statements.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::evaluator::core::Context;
    ///
    /// let mut output = Vec::new();
    /// let mut ctx = Context::with_io(&b""[..], &mut output);
    /// ctx.run_source("print 2 + 3 * 4").unwrap();
    /// drop(ctx);
    ///
    /// assert_eq!(output, b"20");
    /// ```
    pub fn eval_expression(&mut self, expression: &Expression) -> EvalResult<Slot> {
        let line = expression.line;
        let mut operands = expression.values.iter().zip(&expression.unary);

        let Some((first, unary)) = operands.next() else {
            return Ok(Slot::Temporary(None));
        };
        let mut accumulator = self.eval_operand(first, *unary, line)?;

        for (operator, (value, unary)) in expression.operators.iter().zip(operands) {
            self.pin(accumulator);
            let combined = self.combine(accumulator, value, *unary, *operator, line);
            self.unpin(accumulator);
            accumulator = combined?;
        }

        Ok(accumulator)
    }

    /// Evaluates the next operand and applies `operator`, while the caller
    /// holds the accumulator pinned.
    ///
    /// The operand may rebind whatever owns the accumulator's binding, so the
    /// pin can be the last reference to it. An assignment therefore hands
    /// back the assigned object rather than the binding.
    fn combine(&mut self,
               accumulator: Slot,
               value: &Value,
               unary: Option<UnaryOperator>,
               operator: BinaryOperator,
               line: usize)
               -> EvalResult<Slot> {
        let right = self.eval_operand(value, unary, line)?;
        let combined = self.apply_operator(accumulator, right, operator, line)?;
        if operator == BinaryOperator::Assign {
            return Ok(Slot::Temporary(self.load(combined)));
        }
        Ok(combined)
    }

    fn eval_operand(&mut self,
                    value: &Value,
                    unary: Option<UnaryOperator>,
                    line: usize)
                    -> EvalResult<Slot> {
        let slot = self.eval_value(value)?;
        match unary {
            Some(operator) => self.eval_unary(operator, slot, line),
            None => Ok(slot),
        }
    }

    /// Evaluates one operand to the slot it designates.
    ///
    /// Identifiers evaluate to their variable, creating it unbound if the
    /// name is unknown. Literals and calls evaluate to temporaries.
    pub fn eval_value(&mut self, value: &Value) -> EvalResult<Slot> {
        match value {
            Value::Integer(n) => Ok(self.temporary(ObjectData::Number(*n))),
            Value::Text(text) => Ok(self.temporary(ObjectData::Text(text.clone()))),
            Value::Call(call) => Ok(Slot::Temporary(self.eval_call(call)?)),
            Value::Identifier { name, member, line } => {
                let variable = self.lookup_or_create(name);
                match member {
                    Some(member) => self.eval_member(variable, member, *line),
                    None => Ok(Slot::Variable(variable)),
                }
            },
            Value::InlineFunction(def) => {
                let closure = Closure { def:   Rc::clone(def),
                                        scope: Some(self.current_scope()), };
                Ok(self.temporary(ObjectData::Function(closure)))
            },
            Value::InlineObject { entries, .. } => {
                let object = self.heap.create_object(ObjectData::Base);
                let pinned = Slot::Temporary(Some(object));
                self.pin(pinned);
                let result = self.fill_properties(object, entries);
                self.unpin(pinned);
                result.map(|()| pinned)
            },
            Value::List { elements, line } => self.eval_list(elements, *line),
            Value::Index { name, index, line } => {
                let position = self.eval_index(index)?;
                let variable = self.lookup_or_create(name);
                self.element_slot(variable, position, *line)
            },
            Value::Expression(expression) => self.eval_expression(expression),
            Value::Invoke { target,
                            arguments,
                            line, } => {
                let callee = self.eval_value(target)?;
                let callee = self.load(callee);
                Ok(Slot::Temporary(self.invoke(callee, "<expression>", None, arguments, *line)?))
            },
        }
    }

    fn temporary(&mut self, data: ObjectData) -> Slot {
        Slot::Temporary(Some(self.heap.create_object(data)))
    }

    fn fill_properties(&mut self,
                       object: ObjectId,
                       entries: &[(String, Expression)])
                       -> EvalResult<()> {
        for (key, expression) in entries {
            let slot = self.eval_expression(expression)?;
            let value = self.load(slot);
            self.heap.set_property(object, key, value);
        }
        Ok(())
    }

    fn eval_list(&mut self, values: &[Value], line: usize) -> EvalResult<Slot> {
        let mut elements = Vec::with_capacity(values.len());
        let result = self.collect_elements(values, line, &mut elements);
        for &element in &elements {
            self.heap.release_object(element);
        }
        result?;

        Ok(self.temporary(ObjectData::List(elements)))
    }

    /// Evaluates list elements in order, retaining each one until the list
    /// owns it.
    fn collect_elements(&mut self,
                        values: &[Value],
                        line: usize,
                        elements: &mut Vec<ObjectId>)
                        -> EvalResult<()> {
        for value in values {
            let slot = self.eval_value(value)?;
            let Some(element) = self.load(slot) else {
                return Err(RuntimeError::TypeError { details: "list elements cannot be unbound"
                                                                  .to_string(),
                                                     line });
            };
            self.heap.retain_object(element);
            elements.push(element);
        }
        Ok(())
    }
}
