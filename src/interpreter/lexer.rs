use std::{collections::VecDeque, fmt};

use logos::Logos;

use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Identifiers must be strictly shorter than this many characters.
pub const MAX_IDENT_LENGTH: usize = 64;
/// String literals must be strictly shorter than this many characters.
pub const MAX_STRING_LENGTH: usize = 1024;
/// Number of most recent tokens that can be pushed back. Older positions are
/// forgotten, so the lexer's memory does not grow with the input.
pub const MAX_PUSHBACK_DEPTH: usize = 16;

/// The kind of a token, independent of its payload.
///
/// Discriminants are grouped in numeric ranges: binary operators occupy
/// `10..30` and unary operators `30..40`. The parser classifies operators by
/// range membership, see [`TokenKind::is_binary_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// A name such as `counter` or `_tmp1`.
    Identifier   = 1,
    /// An unsigned integer literal.
    Number       = 2,
    /// A double-quoted string literal.
    String       = 3,
    /// End of the source buffer.
    Eof          = 4,
    /// A character that does not begin any token.
    Unknown      = 5,

    /// `and`
    And          = 10,
    /// `or`
    Or           = 11,
    /// `+`
    Add          = 12,
    /// `-`
    Sub          = 13,
    /// `*`
    Mul          = 14,
    /// `/`
    Div          = 15,
    /// `=`
    Assign       = 16,
    /// `>`
    Greater      = 17,
    /// `<`
    Less         = 18,
    /// `>=`
    GreaterEqual = 19,
    /// `<=`
    LessEqual    = 20,
    /// `==`
    Equal        = 21,
    /// `!=` or `<>`
    NotEqual     = 22,
    /// `.`
    Dot          = 23,

    /// Negation; never produced by the lexer, the parser rewrites a leading
    /// `-` into this kind.
    UnarySub     = 30,

    /// `,`
    Comma        = 40,
    /// `(`
    LParen       = 41,
    /// `)`
    RParen       = 42,
    /// `[`
    LBracket     = 43,
    /// `]`
    RBracket     = 44,
    /// `{`
    LBrace       = 45,
    /// `}`
    RBrace       = 46,
    /// `:`
    Colon        = 47,

    /// `end`
    End          = 80,
    /// `if`
    If           = 81,
    /// `else`
    Else         = 82,
    /// `while`
    While        = 83,
    /// `def`
    Def          = 84,
    /// `return`
    Return       = 85,
    /// `print`
    Print        = 86,
}

/// Keywords, checked after an identifier has been scanned.
const KEYWORDS: &[(&str, TokenKind)] = &[("and", TokenKind::And),
                                         ("or", TokenKind::Or),
                                         ("if", TokenKind::If),
                                         ("else", TokenKind::Else),
                                         ("while", TokenKind::While),
                                         ("end", TokenKind::End),
                                         ("def", TokenKind::Def),
                                         ("return", TokenKind::Return),
                                         ("print", TokenKind::Print)];

impl TokenKind {
    /// Returns `true` for kinds in the binary-operator range.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::lexer::TokenKind;
    ///
    /// assert!(TokenKind::Add.is_binary_operator());
    /// assert!(TokenKind::Dot.is_binary_operator());
    /// assert!(!TokenKind::Comma.is_binary_operator());
    /// ```
    #[must_use]
    pub const fn is_binary_operator(self) -> bool {
        let tag = self as u8;
        tag >= 10 && tag < 30
    }

    /// Returns `true` for kinds that may prefix a value.
    ///
    /// `-` is both a binary and a unary operator.
    #[must_use]
    pub const fn is_unary_operator(self) -> bool {
        let tag = self as u8;
        (tag >= 30 && tag < 40) || matches!(self, Self::Sub)
    }

    /// Returns `true` for the kinds that close a block without being consumed
    /// by it.
    #[must_use]
    pub const fn ends_block(self) -> bool {
        matches!(self, Self::End | Self::Else | Self::Def | Self::Eof)
    }

    /// Reclassifies identifier text as a keyword kind, if it is one.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        KEYWORDS.iter()
                .find(|(word, _)| *word == text)
                .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::String => "string",
            Self::Eof => "end of input",
            Self::Unknown => "unknown token",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Add => "'+'",
            Self::Sub | Self::UnarySub => "'-'",
            Self::Mul => "'*'",
            Self::Div => "'/'",
            Self::Assign => "'='",
            Self::Greater => "'>'",
            Self::Less => "'<'",
            Self::GreaterEqual => "'>='",
            Self::LessEqual => "'<='",
            Self::Equal => "'=='",
            Self::NotEqual => "'!='",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Colon => "':'",
            Self::End => "'end'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::Def => "'def'",
            Self::Return => "'return'",
            Self::Print => "'print'",
        };
        write!(f, "{text}")
    }
}

/// Payload carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// Operators, punctuation, keywords and end of input carry nothing.
    None,
    /// Value of a number literal.
    Integer(i64),
    /// Identifier name, decoded string literal, or the unrecognized text.
    Text(String),
}

/// A token as handed to the parser: kind, payload and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// What kind of token this is.
    pub kind:  TokenKind,
    /// Literal payload, if any.
    pub value: TokenValue,
    /// Line on which the token started.
    pub line:  usize,
}

impl Lexeme {
    /// Returns the identifier or string text, or an empty string for tokens
    /// without text.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.value {
            TokenValue::Text(text) => text,
            _ => "",
        }
    }

    /// Consumes the lexeme, returning its text payload.
    #[must_use]
    pub fn into_text(self) -> String {
        match self.value {
            TokenValue::Text(text) => text,
            _ => String::new(),
        }
    }
}

/// Lexical failures raised from inside token callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexicalError {
    /// No token starts at this character.
    #[default]
    Unrecognized,
    /// Identifier reached [`MAX_IDENT_LENGTH`].
    IdentifierTooLong,
    /// String literal reached [`MAX_STRING_LENGTH`].
    StringTooLong,
    /// End of input inside a string literal.
    UnterminatedString,
    /// Number literal does not fit in `i64`.
    IntegerOverflow,
}

/// Raw tokens recognized by the generated scanner.
///
/// Keywords are not listed here: they scan as identifiers and are
/// reclassified afterwards by [`TokenKind::keyword`].
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexicalError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Identifier tokens, such as `x` or `make_counter`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", lex_identifier)]
    Identifier(String),
    /// String literals; the payload has escapes already decoded.
    #[token("\"", lex_string)]
    Str(String),
    /// `# comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `/* block comments */`, which may span lines.
    #[token("/*", skip_block_comment)]
    BlockComment,
    /// Newlines only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `.`
    #[token(".")]
    Dot,
    /// `,`
    #[token(",")]
    Comma,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=` and the older `<>` spelling.
    #[token("!=")]
    #[token("<>")]
    BangEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `:`
    #[token(":")]
    Colon,
}

impl Token {
    /// Converts a scanned token into the parser-facing form.
    fn into_lexeme(self, line: usize) -> Lexeme {
        let (kind, value) = match self {
            Self::Integer(n) => (TokenKind::Number, TokenValue::Integer(n)),
            Self::Identifier(name) => match TokenKind::keyword(&name) {
                Some(kind) => (kind, TokenValue::None),
                None => (TokenKind::Identifier, TokenValue::Text(name)),
            },
            Self::Str(text) => (TokenKind::String, TokenValue::Text(text)),
            Self::Plus => (TokenKind::Add, TokenValue::None),
            Self::Minus => (TokenKind::Sub, TokenValue::None),
            Self::Star => (TokenKind::Mul, TokenValue::None),
            Self::Slash => (TokenKind::Div, TokenValue::None),
            Self::Dot => (TokenKind::Dot, TokenValue::None),
            Self::Comma => (TokenKind::Comma, TokenValue::None),
            Self::LParen => (TokenKind::LParen, TokenValue::None),
            Self::RParen => (TokenKind::RParen, TokenValue::None),
            Self::LBracket => (TokenKind::LBracket, TokenValue::None),
            Self::RBracket => (TokenKind::RBracket, TokenValue::None),
            Self::LBrace => (TokenKind::LBrace, TokenValue::None),
            Self::RBrace => (TokenKind::RBrace, TokenValue::None),
            Self::EqualEqual => (TokenKind::Equal, TokenValue::None),
            Self::BangEqual => (TokenKind::NotEqual, TokenValue::None),
            Self::Equals => (TokenKind::Assign, TokenValue::None),
            Self::GreaterEqual => (TokenKind::GreaterEqual, TokenValue::None),
            Self::Greater => (TokenKind::Greater, TokenValue::None),
            Self::LessEqual => (TokenKind::LessEqual, TokenValue::None),
            Self::Less => (TokenKind::Less, TokenValue::None),
            Self::Colon => (TokenKind::Colon, TokenValue::None),
            // Skipped by their callbacks, never yielded.
            Self::Comment | Self::BlockComment | Self::NewLine => {
                (TokenKind::Unknown, TokenValue::None)
            },
        };
        Lexeme { kind, value, line }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default, Clone)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Parses an integer literal from the current token slice.
fn parse_integer(lex: &mut logos::Lexer<Token>) -> Result<i64, LexicalError> {
    lex.slice()
       .parse()
       .map_err(|_| LexicalError::IntegerOverflow)
}

/// Accepts an identifier if it is shorter than [`MAX_IDENT_LENGTH`].
fn lex_identifier(lex: &mut logos::Lexer<Token>) -> Result<String, LexicalError> {
    let name = lex.slice();
    if name.len() >= MAX_IDENT_LENGTH {
        return Err(LexicalError::IdentifierTooLong);
    }
    Ok(name.to_string())
}

/// Scans the body of a string literal after its opening quote.
///
/// Recognized escapes are `\n`, `\"` and `\\`. A backslash before any other
/// character is kept literally and the character is scanned normally.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexicalError> {
    let body = lex.remainder();
    let mut text = String::new();
    let mut length = 0;
    let mut chars = body.char_indices().peekable();

    let outcome = loop {
        let Some((index, c)) = chars.next() else {
            break Err((body.len(), LexicalError::UnterminatedString));
        };
        match c {
            '"' => break Ok(index + 1),
            '\\' => match chars.peek() {
                Some(&(_, escaped @ ('n' | '"' | '\\'))) => {
                    chars.next();
                    text.push(if escaped == 'n' { '\n' } else { escaped });
                },
                _ => text.push('\\'),
            },
            other => text.push(other),
        }
        length += 1;
        if length >= MAX_STRING_LENGTH {
            let consumed = chars.peek().map_or(body.len(), |&(next, _)| next);
            break Err((consumed, LexicalError::StringTooLong));
        }
    };

    let consumed = match &outcome {
        Ok(consumed) | Err((consumed, _)) => *consumed,
    };
    lex.bump(consumed);
    lex.extras.line += lex.slice().matches('\n').count();

    outcome.map(|_| text).map_err(|(_, error)| error)
}

/// Skips a `/* ... */` comment. An unterminated comment runs to end of input.
fn skip_block_comment(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    let rest = lex.remainder();
    let consumed = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.extras.line += rest[..consumed].matches('\n').count();
    lex.bump(consumed);
    logos::Skip
}

/// Pull-based tokenizer with nested pushback.
///
/// Every call to [`Lexer::next_token`] records the complete scanner state
/// before reading. [`Lexer::push_back`] restores the most recent recorded
/// state that has not been restored yet, so pushback nests up to
/// [`MAX_PUSHBACK_DEPTH`] tokens deep and the line counter always matches the
/// restored position.
pub struct Lexer<'src> {
    inner:       logos::Lexer<'src, Token>,
    checkpoints: VecDeque<logos::Lexer<'src, Token>>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `source`, on line 1.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner:       Token::lexer_with_extras(source, LexerExtras { line: 1 }),
               checkpoints: VecDeque::with_capacity(MAX_PUSHBACK_DEPTH), }
    }

    /// The current line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.inner.extras.line
    }

    /// Reads the next token, advancing the position.
    ///
    /// End of input is reported as a [`TokenKind::Eof`] token, repeatedly if
    /// called again.
    ///
    /// # Errors
    /// Returns a `ParseError` for identifiers or strings over their length
    /// limits, unterminated strings and integer literals that overflow.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::lexer::{Lexer, TokenKind};
    ///
    /// let mut lexer = Lexer::new("x = 10");
    /// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    /// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Assign);
    /// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number);
    /// assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    /// ```
    pub fn next_token(&mut self) -> ParseResult<Lexeme> {
        if self.checkpoints.len() == MAX_PUSHBACK_DEPTH {
            self.checkpoints.pop_front();
        }
        self.checkpoints.push_back(self.inner.clone());

        let Some(result) = self.inner.next() else {
            return Ok(Lexeme { kind:  TokenKind::Eof,
                               value: TokenValue::None,
                               line:  self.line(), });
        };
        let line = self.line() - self.inner.slice().matches('\n').count();

        match result {
            Ok(token) => Ok(token.into_lexeme(line)),
            Err(LexicalError::Unrecognized) => {
                Ok(Lexeme { kind: TokenKind::Unknown,
                            value: TokenValue::Text(self.inner.slice().to_string()),
                            line })
            },
            Err(LexicalError::IdentifierTooLong) => {
                Err(ParseError::IdentifierTooLong { max: MAX_IDENT_LENGTH - 1,
                                                    line })
            },
            Err(LexicalError::StringTooLong) => {
                Err(ParseError::StringTooLong { max: MAX_STRING_LENGTH - 1,
                                                line })
            },
            Err(LexicalError::UnterminatedString) => Err(ParseError::UnterminatedString { line }),
            Err(LexicalError::IntegerOverflow) => Err(ParseError::LiteralTooLarge { line }),
        }
    }

    /// Restores the position recorded by the most recent unrestored
    /// [`Lexer::next_token`] call. Does nothing if there is none.
    pub fn push_back(&mut self) {
        if let Some(previous) = self.checkpoints.pop_back() {
            self.inner = previous;
        }
    }

    /// Reads the next token and restores the position immediately.
    pub fn peek(&mut self) -> ParseResult<Lexeme> {
        let token = self.next_token()?;
        self.push_back();
        Ok(token)
    }

    /// Kind of the next token, without consuming it.
    pub fn peek_kind(&mut self) -> ParseResult<TokenKind> {
        Ok(self.peek()?.kind)
    }
}
