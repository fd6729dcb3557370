use std::rc::Rc;

use crate::{
    ast::{Expression, FunctionCall, Value},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Lexer, TokenKind, TokenValue},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_function_definition,
            utils::{expect, parse_comma_separated},
        },
    },
};

/// Parses one operand of an expression.
///
/// Operands are:
/// - number and string literals
/// - identifiers, with an optional call, index or `.member` suffix
/// - inline functions (`def (...) ... end`)
/// - list literals (`[ ... ]`) and object literals (`{ "key": ... }`)
/// - parenthesized expressions
/// - `print(...)`, the call form of the print builtin
///
/// Calls and parenthesized expressions may be followed by further argument
/// lists, each calling the function the previous value produced.
///
/// Grammar (simplified):
/// ```text
///     value := NUMBER | STRING
///            | IDENT [ "(" args ")" | "[" expression "]" | "." value ]
///            | "def" function_rest
///            | "[" values "]"
///            | "{" entries "}"
///            | "(" expression ")"
/// ```
///
/// # Errors
/// `UnknownValue` if the token cannot begin an operand.
pub fn parse_value(lexer: &mut Lexer<'_>) -> ParseResult<Value> {
    let token = lexer.next_token()?;
    let (kind, line) = (token.kind, token.line);

    let value = match kind {
        TokenKind::Number => {
            let TokenValue::Integer(n) = token.value else {
                return Err(ParseError::UnknownValue { found: kind, line });
            };
            Value::Integer(n)
        },
        TokenKind::String => Value::Text(token.into_text()),
        TokenKind::Identifier => parse_identifier_value(lexer, token)?,
        TokenKind::Def => {
            lexer.push_back();
            Value::InlineFunction(Rc::new(parse_function_definition(lexer, true)?))
        },
        TokenKind::LBracket => {
            let elements = parse_comma_separated(lexer, parse_value, TokenKind::RBracket)?;
            Value::List { elements, line }
        },
        TokenKind::LBrace => parse_object_literal(lexer, line)?,
        TokenKind::LParen => {
            let inner = parse_expression(lexer)?;
            expect(lexer, TokenKind::RParen)?;
            Value::Expression(Box::new(inner))
        },
        TokenKind::Print if lexer.peek_kind()? == TokenKind::LParen => {
            lexer.next_token()?;
            Value::Call(FunctionCall { name: "print".to_string(),
                                       arguments: parse_arguments(lexer)?,
                                       line })
        },
        found => return Err(ParseError::UnknownValue { found, line }),
    };

    parse_invocations(lexer, value)
}

/// Parses what may follow an identifier.
///
/// One token of lookahead decides between a call `name(...)`, an index
/// `name[...]`, a member chain `name.value` and a plain variable reference.
fn parse_identifier_value(lexer: &mut Lexer<'_>, name: Lexeme) -> ParseResult<Value> {
    let line = name.line;
    let name = name.into_text();

    let next = lexer.next_token()?;
    match next.kind {
        TokenKind::LParen => Ok(Value::Call(FunctionCall { name,
                                                           arguments: parse_arguments(lexer)?,
                                                           line })),
        TokenKind::LBracket => {
            let index = parse_expression(lexer)?;
            expect(lexer, TokenKind::RBracket)?;
            Ok(Value::Index { name,
                              index: Box::new(index),
                              line })
        },
        TokenKind::Dot => {
            expect(lexer, TokenKind::Identifier)?;
            lexer.push_back();
            let member = parse_value(lexer)?;
            Ok(Value::Identifier { name,
                                   member: Some(Box::new(member)),
                                   line })
        },
        _ => {
            lexer.push_back();
            Ok(Value::Identifier { name,
                                   member: None,
                                   line })
        },
    }
}

/// Parses `"key": expression` pairs up to the closing brace.
///
/// Grammar: `object := "{" (STRING ":" expression ("," STRING ":" expression)*)? "}"`
fn parse_object_literal(lexer: &mut Lexer<'_>, line: usize) -> ParseResult<Value> {
    let entries = parse_comma_separated(lexer,
                                        |lexer| {
                                            let key = expect(lexer, TokenKind::String)?.into_text();
                                            expect(lexer, TokenKind::Colon)?;
                                            Ok((key, parse_expression(lexer)?))
                                        },
                                        TokenKind::RBrace)?;

    Ok(Value::InlineObject { entries, line })
}

/// Parses call arguments after the opening parenthesis.
fn parse_arguments(lexer: &mut Lexer<'_>) -> ParseResult<Vec<Expression>> {
    parse_comma_separated(lexer, parse_expression, TokenKind::RParen)
}

/// Wraps `value` in [`Value::Invoke`] for every argument list that follows a
/// call or a parenthesized expression.
fn parse_invocations(lexer: &mut Lexer<'_>, mut value: Value) -> ParseResult<Value> {
    if !matches!(value, Value::Call(_) | Value::Expression(_)) {
        return Ok(value);
    }
    loop {
        let token = lexer.next_token()?;
        if token.kind != TokenKind::LParen {
            lexer.push_back();
            return Ok(value);
        }
        value = Value::Invoke { target:    Box::new(value),
                                arguments: parse_arguments(lexer)?,
                                line:      token.line, };
    }
}
