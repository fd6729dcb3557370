/// Lexical and syntactic errors.
///
/// Defines every failure the lexer and parser can report: tokens of the wrong
/// kind where a specific one was required, literals exceeding their fixed
/// limits, and values that cannot start an expression.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while a script is executing,
/// such as division by zero, arity mismatches, calls to unknown functions and
/// built-ins receiving arguments of the wrong kind.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure produced while running a script.
///
/// Both classes are fatal: the library hands them back to the caller, and the
/// command-line shell prints the diagnostic and exits with a failure status.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source (or a nested `eval` source) failed to lex or parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
