use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        parser::core::parse_program,
        runtime::ObjectId,
    },
};

/// Parses a string and runs it as a script in the current context.
///
/// The nested script runs in the caller's current scope. Its named
/// functions are merged into the context, replacing earlier definitions of
/// the same name, and its statements run immediately. The result is the
/// source string itself.
///
/// # Errors
/// - `ExpectedString` if the argument is not a string.
/// - `NestedParse` if the string does not parse, carrying the line of the
///   `eval` call alongside the nested error.
/// - Any runtime error raised by the nested script.
///
/// # Example
/// ```
/// use quill::interpreter::evaluator::core::Context;
///
/// let mut output = Vec::new();
/// let mut ctx = Context::with_io(&b""[..], &mut output);
/// ctx.run_source("s = eval(\"print(7)\") print s").unwrap();
/// drop(ctx);
///
/// assert_eq!(output, b"7print(7)");
/// ```
pub fn eval(ctx: &mut Context<'_>,
            args: &[Option<ObjectId>],
            line: usize)
            -> EvalResult<Option<ObjectId>> {
    let program = parse_program(ctx.expect_text(args[0], "eval", line)?).map_err(|source| {
                      tracing::debug!(line, nested_line = source.line(), "nested script rejected");
                      RuntimeError::NestedParse { source, line }
                  })?;
    tracing::debug!(line,
                    statements = program.statements.len(),
                    functions = program.functions.len(),
                    "evaluating nested script");

    ctx.execute(&program)?;
    Ok(args[0])
}
