/// Entry points of the parser.
///
/// Holds the program-level loop and the flat expression parser that every
/// other parsing routine bottoms out in.
pub mod core;

/// Block parsing.
///
/// Collects statements until a token that closes the enclosing construct.
pub mod block;

/// Statement parsing.
///
/// Handles `if`, `while`, `return`, `print`, expression statements and
/// function definitions.
pub mod statement;

/// Value parsing.
///
/// Parses the operands of an expression: literals, identifiers with their
/// call, index and member suffixes, inline functions, lists and objects.
pub mod value;

/// Utility functions for the parser.
///
/// Provides token expectations and comma-separated list parsing shared by
/// several grammar rules.
pub mod utils;
