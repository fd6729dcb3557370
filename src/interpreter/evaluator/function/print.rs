use std::io::Write;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    runtime::ObjectId,
};

/// Writes a value to the output stream, with no trailing newline.
///
/// Numbers print in decimal and strings print raw; an unbound value prints
/// nothing. The call itself produces no value, so `print(x)` as a statement
/// never ends the enclosing block.
///
/// # Parameters
/// - `ctx`: The context owning the output stream.
/// - `args`: Slice containing one argument.
/// - `_line`: Line number for error reporting (unused).
///
/// # Example
/// ```
/// use quill::interpreter::evaluator::core::Context;
///
/// let mut output = Vec::new();
/// let mut ctx = Context::with_io(&b""[..], &mut output);
/// ctx.run_source("print(\"a\" + 1) print(2)").unwrap();
/// drop(ctx);
///
/// assert_eq!(output, b"a12");
/// ```
pub fn print(ctx: &mut Context<'_>,
             args: &[Option<ObjectId>],
             _line: usize)
             -> EvalResult<Option<ObjectId>> {
    write!(ctx.output, "{}", ctx.heap.render(args[0]))?;
    Ok(None)
}
