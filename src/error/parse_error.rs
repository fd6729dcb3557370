use crate::interpreter::lexer::TokenKind;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A token of one kind was required but another was found.
    #[error("Error on line {line}: expected {expected}, found {found}.")]
    UnexpectedToken {
        /// The kind the grammar required at this point.
        expected: TokenKind,
        /// The kind actually read.
        found:    TokenKind,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The token cannot begin a value.
    #[error("Error on line {line}: {found} cannot start a value.")]
    UnknownValue {
        /// The offending token kind.
        found: TokenKind,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An identifier reached the fixed identifier length limit.
    #[error("Error on line {line}: identifier longer than {max} characters.")]
    IdentifierTooLong {
        /// The longest accepted length.
        max:  usize,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string literal reached the fixed string length limit.
    #[error("Error on line {line}: string literal longer than {max} characters.")]
    StringTooLong {
        /// The longest accepted length.
        max:  usize,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The input ended inside a string literal.
    #[error("Error on line {line}: unterminated string literal.")]
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer literal does not fit in a native signed integer.
    #[error("Error on line {line}: integer literal is too large.")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Returns the line the error was reported on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnknownValue { line, .. }
            | Self::IdentifierTooLong { line, .. }
            | Self::StringTooLong { line, .. }
            | Self::UnterminatedString { line }
            | Self::LiteralTooLarge { line } => *line,
        }
    }
}
