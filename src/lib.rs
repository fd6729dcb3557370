//! # quill
//!
//! quill is a small, dynamically typed scripting language written in Rust.
//! Scripts are lexed and parsed into a flat-expression syntax tree and run by
//! a tree-walking evaluator with closures, inline objects, lists and a
//! reference-counted heap.
//!
//! Expressions have no operator precedence: `2 + 3 * 4` is `20`.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{BufRead, Write};

use crate::{
    ast::Program,
    error::{Error, ParseError},
    interpreter::{evaluator::core::Context, parser::core::parse_program},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expression`, `Value` and `Statement` types that
/// represent a script as a tree. The AST is built by the parser and
/// traversed by the evaluator.
///
/// # Responsibilities
/// - Defines flat expressions, operands and statements for all language
///   constructs.
/// - Attaches line numbers to the nodes that can fail at runtime.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing
/// or evaluating a script. Every error carries the source line it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Formats diagnostics as `Error on line N: ...`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, the runtime heap and
/// evaluation to provide a complete runtime for scripts.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, runtime and evaluator.
/// - Provides entry points for parsing and evaluating user code.
pub mod interpreter;

/// Runs a script against the process's standard input and output.
///
/// # Errors
/// Returns the first parse or runtime error.
///
/// # Examples
/// ```
/// use quill::run;
///
/// assert!(run("x = 2 + 2").is_ok());
///
/// // Division by zero is a runtime error.
/// assert!(run("x = 1 / 0").is_err());
/// ```
pub fn run(source: &str) -> Result<(), Error> {
    Context::new().run_source(source)
}

/// Runs a script with the given input and output streams.
///
/// `input` is consumed by the `input` built-in; everything the script prints
/// is written to `output`, which is flushed before this returns.
///
/// # Errors
/// Returns the first parse or runtime error.
///
/// # Examples
/// ```
/// use quill::run_with_io;
///
/// let mut output = Vec::new();
/// run_with_io("name = input() print \"hi \" + name", &b"ada\n"[..], &mut output).unwrap();
///
/// assert_eq!(output, b"hi ada");
/// ```
pub fn run_with_io(source: &str, input: impl BufRead, output: impl Write) -> Result<(), Error> {
    Context::with_io(input, output).run_source(source)
}

/// Parses a script without running it.
///
/// # Errors
/// Returns the first lexical or syntax error.
///
/// # Examples
/// ```
/// use quill::{error::ParseError, interpreter::lexer::TokenKind, parse};
///
/// let program = parse("def f() return 1 end f()").unwrap();
/// assert_eq!(program.functions.len(), 1);
///
/// let error = parse("if 1 print 2").unwrap_err();
/// assert_eq!(error,
///            ParseError::UnexpectedToken { expected: TokenKind::End,
///                                          found:    TokenKind::Eof,
///                                          line:     1, });
/// ```
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_program(source)
}
