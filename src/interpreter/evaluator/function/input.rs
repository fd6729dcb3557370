use std::io::{BufRead, Write};

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    runtime::{ObjectData, ObjectId},
};

/// Reads one line from the input stream and returns it as a string.
///
/// Pending output is flushed first so a prompt printed just before is
/// visible. The line terminator (`\n` or `\r\n`) is stripped. At end of
/// input the result is the empty string.
///
/// # Errors
/// `Io` if flushing or reading fails.
pub fn input(ctx: &mut Context<'_>,
             _args: &[Option<ObjectId>],
             _line: usize)
             -> EvalResult<Option<ObjectId>> {
    ctx.output.flush()?;

    let mut line = String::new();
    ctx.input.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(Some(ctx.heap.create_object(ObjectData::Text(line))))
}
