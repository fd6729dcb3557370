use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expression, Program, UnaryOperator, Value},
    error::ParseError,
    interpreter::{
        lexer::{Lexer, TokenKind},
        parser::{
            block::starts_named_definition,
            statement::{parse_function_definition, parse_statement},
            value::parse_value,
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete source text into a [`Program`].
///
/// Top-level `def name ...` forms are collected into
/// [`Program::functions`]; everything else becomes a statement. Parsing stops
/// at the end of input and fails on the first error.
///
/// Grammar: `program := (function_definition | statement)* EOF`
///
/// # Parameters
/// - `source`: The script text.
///
/// # Returns
/// The parsed program.
///
/// # Example
/// ```
/// use quill::interpreter::parser::core::parse_program;
///
/// let program = parse_program("def twice(x) return x * 2 end\nprint twice(4)").unwrap();
/// assert_eq!(program.functions.len(), 1);
/// assert_eq!(program.statements.len(), 1);
/// ```
pub fn parse_program(source: &str) -> ParseResult<Program> {
    let mut lexer = Lexer::new(source);
    let mut program = Program::default();

    loop {
        if lexer.peek_kind()? == TokenKind::Eof {
            break;
        }
        if starts_named_definition(&mut lexer)? {
            program.functions
                   .push(Rc::new(parse_function_definition(&mut lexer, false)?));
        } else {
            program.statements.push(parse_statement(&mut lexer)?);
        }
    }

    tracing::debug!(statements = program.statements.len(),
                    functions = program.functions.len(),
                    "parsed program");

    Ok(program)
}

/// Parses an expression as a flat list of operands and operators.
///
/// No precedence is applied: operands and operators are recorded in source
/// order and evaluated strictly left to right. Each operand may carry one
/// prefix `-`. When an `=` is read, the whole remainder is parsed as a
/// nested expression and stored as the final operand, which makes
/// assignment right-associative.
///
/// Grammar: `expression := ["-"] value (binop ["-"] value)*`
///
/// # Parameters
/// - `lexer`: Lexer positioned at the first token of the expression.
///
/// # Returns
/// The parsed [`Expression`]. The token following it is left unconsumed.
pub fn parse_expression(lexer: &mut Lexer<'_>) -> ParseResult<Expression> {
    let line = lexer.peek()?.line;
    let mut expression = Expression { values: Vec::new(),
                                      operators: Vec::new(),
                                      unary: Vec::new(),
                                      line };

    loop {
        let token = lexer.next_token()?;
        if token.kind.is_unary_operator() {
            expression.unary.push(Some(UnaryOperator::Negate));
        } else {
            lexer.push_back();
            expression.unary.push(None);
        }
        expression.values.push(parse_value(lexer)?);

        let token = lexer.next_token()?;
        let operator = if token.kind.is_binary_operator() {
            BinaryOperator::from_token(token.kind)
        } else {
            None
        };
        let Some(operator) = operator else {
            lexer.push_back();
            break;
        };

        expression.operators.push(operator);
        if operator == BinaryOperator::Assign {
            let rhs = parse_expression(lexer)?;
            expression.unary.push(None);
            expression.values.push(Value::Expression(Box::new(rhs)));
            break;
        }
    }

    Ok(expression)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{FunctionCall, Statement};

    fn expression_of(source: &str) -> Expression {
        let mut program = parse_program(source).unwrap();
        match program.statements.remove(0) {
            Statement::Expression(expression) => expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn ident(name: &str, line: usize) -> Value {
        Value::Identifier { name: name.to_string(),
                            member: None,
                            line }
    }

    #[test]
    fn operators_are_recorded_in_source_order() {
        let expression = expression_of("2 + 3 * 4");

        assert_eq!(expression.values,
                   vec![Value::Integer(2), Value::Integer(3), Value::Integer(4)]);
        assert_eq!(expression.operators,
                   vec![BinaryOperator::Add, BinaryOperator::Mul]);
        assert_eq!(expression.unary, vec![None, None, None]);
    }

    #[test]
    fn leading_minus_becomes_a_unary_slot() {
        let expression = expression_of("-a - -1");

        assert_eq!(expression.unary,
                   vec![Some(UnaryOperator::Negate), Some(UnaryOperator::Negate)]);
        assert_eq!(expression.operators, vec![BinaryOperator::Sub]);
    }

    #[test]
    fn assignment_takes_the_whole_right_hand_side() {
        let expression = expression_of("a = b = 1 + 2");

        assert_eq!(expression.operators, vec![BinaryOperator::Assign]);
        assert!(expression.is_assignment());
        let Value::Expression(rhs) = &expression.values[1] else {
            panic!("right-hand side should be nested");
        };
        assert_eq!(rhs.operators, vec![BinaryOperator::Assign]);
        let Value::Expression(innermost) = &rhs.values[1] else {
            panic!("chained assignment should nest again");
        };
        assert_eq!(innermost.operators, vec![BinaryOperator::Add]);
    }

    #[test]
    fn member_chains_nest_to_the_right() {
        let expression = expression_of("a.b.c(1)");

        let expected =
            Value::Identifier { name:   "a".to_string(),
                                member: Some(Box::new(Value::Identifier {
                                    name: "b".to_string(),
                                    member: Some(Box::new(Value::Call(FunctionCall {
                                        name: "c".to_string(),
                                        arguments: vec![expression_of("1")],
                                        line: 1,
                                    }))),
                                    line: 1,
                                })),
                                line:   1, };
        assert_eq!(expression.values, vec![expected]);
    }

    #[test]
    fn named_definitions_are_hoisted_out_of_statements() {
        let program = parse_program("x = 1\ndef f(a, b) return a end\nprint x").unwrap();

        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].params, vec!["a", "b"]);
        assert_eq!(program.functions[0].line, 2);
    }

    #[test]
    fn expression_stops_before_a_non_operator() {
        let program = parse_program("a b").unwrap();

        assert_eq!(program.statements,
                   vec![Statement::Expression(Expression { values:    vec![ident("a", 1)],
                                                           operators: vec![],
                                                           unary:     vec![None],
                                                           line:      1, }),
                        Statement::Expression(Expression { values:    vec![ident("b", 1)],
                                                           operators: vec![],
                                                           unary:     vec![None],
                                                           line:      1, })]);
    }

    #[test]
    fn errors_carry_the_offending_line() {
        let error = parse_program("x = 1\n\nif x print x").unwrap_err();

        assert_eq!(error,
                   ParseError::UnexpectedToken { expected: TokenKind::End,
                                                 found:    TokenKind::Eof,
                                                 line:     3, });
    }

    #[test]
    fn stray_end_is_rejected() {
        let error = parse_program("end").unwrap_err();

        assert_eq!(error,
                   ParseError::UnknownValue { found: TokenKind::End,
                                              line:  1, });
    }
}
