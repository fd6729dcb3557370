/// Call dispatch.
///
/// Resolves a callee against the built-ins, the named functions and
/// variables holding closures, and runs user-defined functions in a fresh
/// scope.
pub mod core;

/// The `print` built-in.
///
/// Writes a value without a trailing newline.
pub mod print;

/// The `input` built-in.
///
/// Reads one line from the input stream.
pub mod input;

/// The `getenv` built-in.
///
/// Looks up a process environment variable.
pub mod getenv;

/// The `len` built-in.
///
/// Returns the number of elements of a list.
pub mod len;

/// The `eval` built-in.
///
/// Parses and runs a string as a script in the current context.
pub mod eval;
