use crate::{
    ast::Block,
    interpreter::{
        lexer::{Lexer, TokenKind},
        parser::{core::ParseResult, statement::parse_statement},
    },
};

/// Parses statements until a block-closing token.
///
/// A block ends at `end`, `else`, a named `def` or the end of input. The
/// closing token is left for the enclosing construct to consume, so the
/// same routine serves function bodies, `if` branches and `while` bodies.
/// An anonymous `def (...)` is an inline function value and does not close
/// the block.
///
/// Grammar: `block := statement*`
///
/// # Parameters
/// - `lexer`: Lexer positioned at the first statement of the block.
///
/// # Returns
/// The parsed block, possibly empty.
pub fn parse_block(lexer: &mut Lexer<'_>) -> ParseResult<Block> {
    let mut block = Block::default();

    loop {
        let kind = lexer.peek_kind()?;
        if kind == TokenKind::Def {
            if starts_named_definition(lexer)? {
                break;
            }
        } else if kind.ends_block() {
            break;
        }
        block.statements.push(parse_statement(lexer)?);
    }

    Ok(block)
}

/// Returns `true` when the next tokens are `def` followed by a name.
///
/// Consumes nothing.
pub(in crate::interpreter::parser) fn starts_named_definition(lexer: &mut Lexer<'_>)
                                                              -> ParseResult<bool> {
    if lexer.next_token()?.kind != TokenKind::Def {
        lexer.push_back();
        return Ok(false);
    }
    let named = lexer.next_token()?.kind == TokenKind::Identifier;
    lexer.push_back();
    lexer.push_back();

    Ok(named)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Statement;

    #[test]
    fn block_leaves_its_terminator_unconsumed() {
        let mut lexer = Lexer::new("a = 1 b = 2 else c");
        let block = parse_block(&mut lexer).unwrap();

        assert_eq!(block.statements.len(), 2);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Else);
    }

    #[test]
    fn named_def_closes_a_block_but_inline_def_does_not() {
        let mut lexer = Lexer::new("x = 1 def() x end def g() end");
        let block = parse_block(&mut lexer).unwrap();

        assert_eq!(block.statements.len(), 2);
        assert!(matches!(block.statements[1], Statement::Expression(_)));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Def);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    }

    #[test]
    fn empty_block_at_end_of_input() {
        let mut lexer = Lexer::new("   ");
        let block = parse_block(&mut lexer).unwrap();

        assert!(block.statements.is_empty());
    }
}
