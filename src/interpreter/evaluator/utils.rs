use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{ObjectData, ObjectId},
    },
};

impl Context<'_> {
    /// Truthiness used by `if`, `while`, `and` and `or`.
    ///
    /// An unbound value is false, a number is true when non-zero, and every
    /// other object is true.
    pub(crate) fn is_truthy(&self, object: Option<ObjectId>) -> bool {
        match object.map(|object| self.heap.data(object)) {
            None => false,
            Some(ObjectData::Number(n)) => *n != 0,
            Some(_) => true,
        }
    }

    /// The text of a string argument to a built-in.
    ///
    /// # Errors
    /// `ExpectedString` naming `function` if `object` is not a string.
    pub(crate) fn expect_text(&self,
                              object: Option<ObjectId>,
                              function: &'static str,
                              line: usize)
                              -> EvalResult<&str> {
        match object.map(|object| self.heap.data(object)) {
            Some(ObjectData::Text(text)) => Ok(text),
            _ => Err(RuntimeError::ExpectedString { function, line }),
        }
    }
}
