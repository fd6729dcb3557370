/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// applies operators, calls functions and closures, and writes output. It is
/// the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, closures and control flow.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces tokens on
/// demand, each corresponding to a meaningful language element such as a
/// number, identifier, operator, delimiter or keyword. It can step back over
/// tokens already read. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with kind, payload and
///   line number.
/// - Skips whitespace and comments while keeping the line count exact.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser pulls tokens from the lexer and constructs an AST that
/// represents the syntactic structure of statements, expressions and
/// function definitions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates the grammar, reporting the expected and found token and the
///   line on the first error.
pub mod parser;
/// The runtime module holds the data a running script manipulates.
///
/// Objects, variables and scopes live on a reference-counted heap addressed
/// by typed handles.
///
/// # Responsibilities
/// - Defines the object kinds: property bags, numbers, strings, closures and
///   lists.
/// - Tracks reference counts and frees what is no longer reachable.
/// - Implements two-level variable lookup and object properties.
pub mod runtime;
