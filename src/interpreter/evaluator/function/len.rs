use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        runtime::{ObjectData, ObjectId},
    },
};

/// Returns the number of elements of a list.
///
/// # Errors
/// `ExpectedList` if the argument is not a list.
///
/// # Example
/// ```
/// use quill::interpreter::evaluator::core::Context;
///
/// let mut output = Vec::new();
/// let mut ctx = Context::with_io(&b""[..], &mut output);
/// ctx.run_source("print len([1, [2, 3], \"x\"])").unwrap();
/// drop(ctx);
///
/// assert_eq!(output, b"3");
/// ```
pub fn len(ctx: &mut Context<'_>,
           args: &[Option<ObjectId>],
           line: usize)
           -> EvalResult<Option<ObjectId>> {
    let count = match args[0].map(|object| ctx.heap.data(object)) {
        Some(ObjectData::List(elements)) => elements.len(),
        _ => return Err(RuntimeError::ExpectedList { function: "len", line }),
    };

    let count = i64::try_from(count).unwrap_or(i64::MAX);
    Ok(Some(ctx.heap.create_object(ObjectData::Number(count))))
}
