use crate::{
    ast::{Expression, Value},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Slot},
        runtime::{ObjectData, ObjectId, VariableId},
    },
};

impl Context<'_> {
    /// Evaluates the `.member` tail of an identifier chain.
    ///
    /// The receiver is whatever `base` is bound to. A plain member resolves
    /// to the receiver's property of that name, created unbound if missing;
    /// a call invokes the property as a method with `this` bound to the
    /// receiver; an index reads the property as a list.
    ///
    /// # Errors
    /// `UnboundOperand` if `base` is unbound.
    pub(crate) fn eval_member(&mut self,
                              base: VariableId,
                              member: &Value,
                              line: usize)
                              -> EvalResult<Slot> {
        let receiver = self.heap
                           .variable(base)
                           .object
                           .ok_or_else(|| RuntimeError::UnboundOperand { operator: ".".to_string(),
                                                                         line })?;

        let pinned = Slot::Temporary(Some(receiver));
        self.pin(pinned);
        let result = self.eval_member_of(base, receiver, member, line);
        self.unpin(pinned);
        result
    }

    fn eval_member_of(&mut self,
                      base: VariableId,
                      receiver: ObjectId,
                      member: &Value,
                      line: usize)
                      -> EvalResult<Slot> {
        match member {
            Value::Identifier { name,
                                member: None,
                                .. } => Ok(Slot::Variable(self.heap.get_property(receiver, name))),
            Value::Identifier { name,
                                member: Some(rest),
                                line, } => {
                let property = self.heap.get_property(receiver, name);
                self.eval_member(property, rest, *line)
            },
            Value::Call(call) => {
                let property = self.heap.get_property(receiver, &call.name);
                let callee = self.heap.variable(property).object;
                Ok(Slot::Temporary(self.invoke(callee,
                                               &call.name,
                                               Some(receiver),
                                               &call.arguments,
                                               call.line)?))
            },
            Value::Index { name, index, line } => {
                let position = self.eval_index(index)?;
                let property = self.heap.get_property(receiver, name);
                self.element_slot(property, position, *line)
            },
            Value::Invoke { target,
                            arguments,
                            line, } => {
                let callee = self.eval_member(base, target, *line)?;
                let callee = self.load(callee);
                Ok(Slot::Temporary(self.invoke(callee, "<expression>", None, arguments, *line)?))
            },
            _ => Err(RuntimeError::TypeError { details: "'.' must be followed by a member name"
                                                            .to_string(),
                                               line }),
        }
    }

    /// Evaluates an index expression to a number.
    pub(crate) fn eval_index(&mut self, index: &Expression) -> EvalResult<i64> {
        let slot = self.eval_expression(index)?;
        match self.load(slot).map(|object| self.heap.data(object)) {
            Some(ObjectData::Number(n)) => Ok(*n),
            Some(other) => Err(RuntimeError::TypeError { details: format!("list index must be a \
                                                                           number, not a {}",
                                                                          other.kind_name()),
                                                         line:    index.line, }),
            None => Err(RuntimeError::UnboundOperand { operator: "[]".to_string(),
                                                       line:     index.line, }),
        }
    }

    /// Resolves element `position` of the list bound to `variable`.
    ///
    /// # Errors
    /// - `UnboundOperand` if the variable is unbound.
    /// - `TypeError` if it is bound to something other than a list.
    /// - `IndexOutOfBounds` if `position` is negative or past the end.
    pub(crate) fn element_slot(&self,
                               variable: VariableId,
                               position: i64,
                               line: usize)
                               -> EvalResult<Slot> {
        let list = self.heap
                       .variable(variable)
                       .object
                       .ok_or_else(|| RuntimeError::UnboundOperand { operator: "[]".to_string(),
                                                                     line })?;
        let len = match self.heap.data(list) {
            ObjectData::List(elements) => elements.len(),
            other => {
                return Err(RuntimeError::TypeError { details: format!("cannot index a {}",
                                                                      other.kind_name()),
                                                     line });
            },
        };

        match usize::try_from(position) {
            Ok(index) if index < len => Ok(Slot::Element { list, index }),
            _ => Err(RuntimeError::IndexOutOfBounds { len,
                                                      found: position,
                                                      line }),
        }
    }
}
