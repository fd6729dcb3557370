use std::{fmt, rc::Rc};

use crate::interpreter::lexer::TokenKind;

/// An expression as a flat, precedence-free sequence.
///
/// `values[0] op[0] values[1] op[1] ...` is evaluated strictly left to right,
/// so `2+3*4` means `(2+3)*4`. Every value has exactly one unary slot.
///
/// When the last operator is [`BinaryOperator::Assign`], the last value is a
/// [`Value::Expression`] holding the whole right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The operands, in source order.
    pub values:    Vec<Value>,
    /// The operators between consecutive operands.
    pub operators: Vec<BinaryOperator>,
    /// One optional prefix operator per operand.
    pub unary:     Vec<Option<UnaryOperator>>,
    /// Line number in the source code.
    pub line:      usize,
}

impl Expression {
    /// Returns `true` when the expression ends in an assignment.
    #[must_use]
    pub fn is_assignment(&self) -> bool {
        self.operators.last() == Some(&BinaryOperator::Assign)
    }
}

/// An operand of an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A number literal.
    Integer(i64),
    /// A string literal, escapes decoded.
    Text(String),
    /// `name(args...)`
    Call(FunctionCall),
    /// A variable reference, optionally followed by a `.member` chain.
    Identifier {
        /// The variable name.
        name:   String,
        /// What follows the dot: another identifier, a call or an index.
        member: Option<Box<Self>>,
        /// Line number in the source code.
        line:   usize,
    },
    /// An anonymous `def (...) ... end`.
    InlineFunction(Rc<FunctionDef>),
    /// `{"key": expression, ...}`
    InlineObject {
        /// Keys paired with their initializers, in source order.
        entries: Vec<(String, Expression)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `[value, ...]`
    List {
        /// The element values.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `name[index]`
    Index {
        /// Name of the list variable.
        name:  String,
        /// Index expression.
        index: Box<Expression>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `( expression )`, or the right-hand side of an assignment.
    Expression(Box<Expression>),
    /// A call of whatever function object `target` produces, as in
    /// `make()()`.
    Invoke {
        /// The value being called.
        target:    Box<Self>,
        /// Argument expressions, evaluated in the caller's scope.
        arguments: Vec<Expression>,
        /// Line number in the source code.
        line:      usize,
    },
}

/// A call of a named function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The callee name.
    pub name:      String,
    /// Argument expressions, evaluated in the caller's scope.
    pub arguments: Vec<Expression>,
    /// Line number in the source code.
    pub line:      usize,
}

/// A function definition, named at top level or anonymous inline.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function; `None` for inline functions.
    pub name:   Option<String>,
    /// The parameter names.
    pub params: Vec<String>,
    /// The statements run when the function is called.
    pub body:   Block,
    /// Line number in the source code.
    pub line:   usize,
}

impl FunctionDef {
    /// Name used in diagnostics.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<inline>")
    }
}

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its result.
    Expression(Expression),
    /// `if condition ... [else ...] end`
    If {
        /// The condition.
        condition:  Expression,
        /// Statements run when the condition holds.
        then_block: Block,
        /// Statements run otherwise, if an `else` was given.
        else_block: Option<Block>,
    },
    /// `while condition ... end`
    While {
        /// The loop condition, re-evaluated before every iteration.
        condition: Expression,
        /// The loop body.
        body:      Block,
    },
    /// `return expression`
    Return(Expression),
    /// `print expression`
    Print(Expression),
}

/// A parsed script: top-level statements and named function definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, in source order.
    pub statements: Vec<Statement>,
    /// Top-level function definitions, in source order.
    pub functions:  Vec<Rc<FunctionDef>>,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Assignment (`=`)
    Assign,
    /// Greater than (`>`)
    Greater,
    /// Less than (`<`)
    Less,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Member access (`.`) outside an identifier chain
    Dot,
}

impl BinaryOperator {
    /// Maps a token kind from the binary-operator range to its operator.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            TokenKind::Add => Self::Add,
            TokenKind::Sub => Self::Sub,
            TokenKind::Mul => Self::Mul,
            TokenKind::Div => Self::Div,
            TokenKind::Assign => Self::Assign,
            TokenKind::Greater => Self::Greater,
            TokenKind::Less => Self::Less,
            TokenKind::GreaterEqual => Self::GreaterEqual,
            TokenKind::LessEqual => Self::LessEqual,
            TokenKind::Equal => Self::Equal,
            TokenKind::NotEqual => Self::NotEqual,
            TokenKind::Dot => Self::Dot,
            _ => return None,
        };
        Some(op)
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Assign, Div, Dot, Equal, Greater, GreaterEqual, Less, LessEqual, Mul,
            NotEqual, Or, Sub,
        };
        let operator = match self {
            And => "and",
            Or => "or",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Assign => "=",
            Greater => ">",
            Less => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            Equal => "==",
            NotEqual => "!=",
            Dot => ".",
        };
        write!(f, "{operator}")
    }
}
