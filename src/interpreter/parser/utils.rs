use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Lexer, TokenKind},
        parser::core::ParseResult,
    },
};

/// Consumes the next token, requiring it to be of kind `expected`.
///
/// # Parameters
/// - `lexer`: Lexer positioned at the required token.
/// - `expected`: The kind the grammar requires here.
///
/// # Returns
/// The consumed token.
///
/// # Errors
/// `UnexpectedToken` naming both kinds and the line of the offending token.
pub(in crate::interpreter::parser) fn expect(lexer: &mut Lexer<'_>,
                                             expected: TokenKind)
                                             -> ParseResult<Lexeme> {
    let token = lexer.next_token()?;
    if token.kind == expected {
        Ok(token)
    } else {
        Err(ParseError::UnexpectedToken { expected,
                                          found: token.kind,
                                          line: token.line })
    }
}

/// Parses a plain identifier and returns its name.
pub(in crate::interpreter::parser) fn parse_identifier(lexer: &mut Lexer<'_>)
                                                       -> ParseResult<String> {
    Ok(expect(lexer, TokenKind::Identifier)?.into_text())
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by argument lists, parameter lists, list literals
/// and object literals. It repeatedly calls `parse_item` to parse one
/// element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `lexer`: Lexer positioned just after the opening token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token kind that terminates the list (e.g. `]` or `)`).
///
/// # Returns
/// A vector of parsed items. The closing token is consumed.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - a token other than `,` or `closing` follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'src, T>(
    lexer: &mut Lexer<'src>,
    parse_item: impl Fn(&mut Lexer<'src>) -> ParseResult<T>,
    closing: TokenKind)
    -> ParseResult<Vec<T>> {
    let mut items = Vec::new();
    if lexer.peek_kind()? == closing {
        lexer.next_token()?;

        return Ok(items);
    }
    loop {
        items.push(parse_item(lexer)?);
        let token = lexer.next_token()?;
        match token.kind {
            TokenKind::Comma => {},
            kind if kind == closing => break,
            found => {
                return Err(ParseError::UnexpectedToken { expected: closing,
                                                         found,
                                                         line: token.line });
            },
        }
    }
    Ok(items)
}
