use std::env;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    runtime::{ObjectData, ObjectId},
};

/// Looks up a process environment variable by name.
///
/// Returns its value as a string, or an unbound value if the variable is
/// not set. Values that are not valid Unicode are converted lossily.
///
/// # Errors
/// `ExpectedString` if the argument is not a string.
pub fn getenv(ctx: &mut Context<'_>,
              args: &[Option<ObjectId>],
              line: usize)
              -> EvalResult<Option<ObjectId>> {
    let name = ctx.expect_text(args[0], "getenv", line)?;
    let Some(value) = env::var_os(name) else {
        return Ok(None);
    };

    let value = value.to_string_lossy().into_owned();
    Ok(Some(ctx.heap.create_object(ObjectData::Text(value))))
}
