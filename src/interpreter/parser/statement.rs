use crate::{
    ast::{FunctionDef, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexer, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, parse_identifier},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - `if <expression> <block> [else <block>] end`
/// - `while <expression> <block> end`
/// - `return <expression>`
/// - `print <expression>`
/// - an expression used as a statement.
///
/// The form is chosen by the leading keyword; anything else is parsed as an
/// expression statement.
///
/// # Parameters
/// - `lexer`: Lexer positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement(lexer: &mut Lexer<'_>) -> ParseResult<Statement> {
    let token = lexer.next_token()?;
    match token.kind {
        TokenKind::If => parse_if(lexer),
        TokenKind::While => parse_while(lexer),
        TokenKind::Return => Ok(Statement::Return(parse_expression(lexer)?)),
        TokenKind::Print => {
            // `print(x)` at statement start is the builtin call, which keeps
            // `print(a) + 1` an ordinary expression.
            if lexer.peek_kind()? == TokenKind::LParen {
                lexer.push_back();
                Ok(Statement::Expression(parse_expression(lexer)?))
            } else {
                Ok(Statement::Print(parse_expression(lexer)?))
            }
        },
        _ => {
            lexer.push_back();
            Ok(Statement::Expression(parse_expression(lexer)?))
        },
    }
}

/// Parses the remainder of an `if` statement after the keyword.
///
/// Syntax:
/// ```text
///     if <condition> <statements> end
///     if <condition> <statements> else <statements> end
/// ```
/// `else if` is an `if` statement nested in the `else` block and therefore
/// needs its own `end`.
///
/// # Errors
/// `UnexpectedToken` if the branch is not closed by `else` or `end`.
fn parse_if(lexer: &mut Lexer<'_>) -> ParseResult<Statement> {
    let condition = parse_expression(lexer)?;
    let then_block = parse_block(lexer)?;

    let token = lexer.next_token()?;
    let else_block = match token.kind {
        TokenKind::Else => {
            let block = parse_block(lexer)?;
            expect(lexer, TokenKind::End)?;
            Some(block)
        },
        TokenKind::End => None,
        found => {
            return Err(ParseError::UnexpectedToken { expected: TokenKind::End,
                                                     found,
                                                     line: token.line });
        },
    };

    Ok(Statement::If { condition,
                       then_block,
                       else_block })
}

/// Parses the remainder of a `while` loop after the keyword.
fn parse_while(lexer: &mut Lexer<'_>) -> ParseResult<Statement> {
    let condition = parse_expression(lexer)?;
    let body = parse_block(lexer)?;
    expect(lexer, TokenKind::End)?;

    Ok(Statement::While { condition, body })
}

/// Parses a function definition.
///
/// Syntax:
/// ```text
///     def <name> [ ( param, ... ) ] <statements> end     named
///     def [ ( param, ... ) ] <statements> end            inline
/// ```
/// The parameter list may be omitted entirely when a function takes no
/// arguments.
///
/// # Parameters
/// - `lexer`: Lexer positioned at the `def` keyword.
/// - `inline`: `true` for an anonymous function used as a value.
///
/// # Returns
/// The parsed [`FunctionDef`]; `name` is `None` for inline functions.
///
/// # Errors
/// Returns a `ParseError` if:
/// - a named definition lacks its name,
/// - the parameter list is malformed,
/// - the body is not closed by `end`.
pub fn parse_function_definition(lexer: &mut Lexer<'_>,
                                 inline: bool)
                                 -> ParseResult<FunctionDef> {
    let line = expect(lexer, TokenKind::Def)?.line;
    let name = if inline {
        None
    } else {
        Some(parse_identifier(lexer)?)
    };

    let params = if lexer.peek_kind()? == TokenKind::LParen {
        lexer.next_token()?;
        parse_comma_separated(lexer, parse_identifier, TokenKind::RParen)?
    } else {
        Vec::new()
    };

    let body = parse_block(lexer)?;
    expect(lexer, TokenKind::End)?;

    Ok(FunctionDef { name,
                     params,
                     body,
                     line })
}
