use crate::error::ParseError;

/// Represents all errors that can occur during evaluation and runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Called a name that is neither a built-in, a top-level function nor a
    /// variable.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a variable whose object is not a function.
    #[error("Error on line {line}: '{name}' is not callable.")]
    NotCallable {
        /// The name that was called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The call site and the definition disagree on the number of parameters.
    #[error("Error on line {line}: '{name}' takes {expected} argument(s) but {found} were given.")]
    ArgumentCountMismatch {
        /// The function being called.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of arguments at the call site.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible kind.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the kind mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A list object was expected, but not found.
    #[error("Error on line {line}: '{function}' expects a list.")]
    ExpectedList {
        /// The built-in that rejected its argument.
        function: &'static str,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A string object was expected, but not found.
    #[error("Error on line {line}: '{function}' expects a string.")]
    ExpectedString {
        /// The built-in that rejected its argument.
        function: &'static str,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An operator was applied to a variable that was never bound.
    #[error("Error on line {line}: Operand of '{operator}' is unbound.")]
    UnboundOperand {
        /// The operator being applied.
        operator: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The left side of `=` is not a variable, property or list element.
    #[error("Error on line {line}: Left side of assignment is not assignable.")]
    InvalidAssignment {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to access a list element outside its bounds.
    #[error("Error on line {line}: Index {found} out of bounds for list of length {len}.")]
    IndexOutOfBounds {
        /// Length of the list.
        len:   usize,
        /// The index that was actually requested.
        found: i64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A script passed to `eval` failed to parse.
    #[error("Error on line {line}: eval failed to parse: {source}")]
    NestedParse {
        /// The parse error, with lines counted within the nested source.
        source: ParseError,
        /// The line of the `eval` call.
        line:   usize,
    },
    /// Reading the input stream or writing the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
