/// Core evaluation state.
///
/// Contains the runtime context, the statement-result and operand-slot types
/// shared by all evaluation routines, and the entry points for running a
/// program.
pub mod core;

/// Block and statement evaluation.
///
/// Runs statements in order, stopping at the first one that yields, and
/// implements `if`, `while`, `return` and `print`.
pub mod block;

/// Expression evaluation.
///
/// Walks a flat expression left to right and evaluates each kind of operand.
pub mod expression;

/// Member chains and list indexing.
///
/// Resolves `a.b.c`, method calls with `this`, and `xs[i]`.
pub mod member;

/// Binary operator evaluation.
///
/// Implements assignment, logical operators and the cross-kind arithmetic
/// and comparison rules.
pub mod binary;

/// Unary operator evaluation.
pub mod unary;

/// Utility functions for evaluation.
///
/// Provides truthiness and argument checks shared by evaluation logic.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined functions, closures and built-in calls.
pub mod function;
