//! Token stream for the lightweight Java parser.
//!
//! Keywords are lexed as [`TokenKind::Ident`]; the parser matches on their
//! text. `>` is never combined with a following `>` so that nested generic
//! argument lists close correctly; the parser reassembles shift operators
//! from adjacent tokens.

use nova_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) text: String,
    pub(crate) range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TokenKind {
    Ident,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,
    At,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    ColonColon,
    Question,
    Arrow,
    Eq,
    EqEq,
    Bang,
    BangEq,
    Tilde,
    Lt,
    LtEq,
    LtLt,
    LtLtEq,
    Gt,
    GtEq,
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    Unknown,
}

impl TokenKind {
    pub(crate) fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::TextBlock
        )
    }
}

/// Punctuation ordered longest first so that the first prefix match wins.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::LtLtEq),
    ("...", TokenKind::Ellipsis),
    ("::", TokenKind::ColonColon),
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::BangEq),
    ("<=", TokenKind::LtEq),
    ("<<", TokenKind::LtLt),
    (">=", TokenKind::GtEq),
    ("++", TokenKind::PlusPlus),
    ("+=", TokenKind::PlusEq),
    ("--", TokenKind::MinusMinus),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("&&", TokenKind::AmpAmp),
    ("&=", TokenKind::AmpEq),
    ("||", TokenKind::PipePipe),
    ("|=", TokenKind::PipeEq),
    ("^=", TokenKind::CaretEq),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semi),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("@", TokenKind::At),
    ("=", TokenKind::Eq),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
];

pub(crate) struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str, offset: usize) -> Self {
        Lexer {
            text,
            offset,
            pos: 0,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.bump_char();
            }

            let rem = self.remaining();
            if rem.starts_with("//") {
                while let Some(c) = self.bump_char() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }

            if rem.starts_with("/*") {
                self.pos += 2;
                match self.remaining().find("*/") {
                    Some(idx) => self.pos += idx + 2,
                    None => self.pos = self.text.len(),
                }
                continue;
            }

            break;
        }
    }

    fn lex_identifier(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.bump_char();
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let radix_prefixed = first == '0' && matches!(self.peek_char(), Some('x' | 'X' | 'b' | 'B'));
        let mut is_float = first == '.';
        let mut seen_dot = first == '.';

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                let exponent = if radix_prefixed {
                    matches!(c, 'p' | 'P')
                } else {
                    matches!(c, 'e' | 'E')
                };
                if !radix_prefixed && matches!(c, 'f' | 'F' | 'd' | 'D') {
                    is_float = true;
                }
                self.bump_char();
                if exponent {
                    is_float = true;
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.bump_char();
                    }
                }
                continue;
            }
            if c == '.' && !seen_dot && !radix_prefixed {
                // `1.` is a float; `1.foo` never happens in valid Java, but a
                // following `.` (`1..`) or identifier start means this dot is
                // not part of the literal.
                match self.peek_char_n(1) {
                    Some(next) if next.is_ascii_digit() => {}
                    Some(next) if is_ident_start(next) && !matches!(next, 'e' | 'E' | 'f' | 'F' | 'd' | 'D') => break,
                    Some('.') => break,
                    _ => {}
                }
                seen_dot = true;
                is_float = true;
                self.bump_char();
                continue;
            }
            break;
        }

        if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        }
    }

    fn lex_quoted(&mut self, quote: char) {
        // Opening quote already consumed.
        while let Some(c) = self.bump_char() {
            match c {
                '\\' => {
                    self.bump_char();
                }
                '\n' => break,
                c if c == quote => break,
                _ => {}
            }
        }
    }

    fn lex_text_block(&mut self) {
        // Opening `"""` already consumed.
        loop {
            let rem = self.remaining();
            if rem.is_empty() {
                break;
            }
            if rem.starts_with("\\") {
                self.bump_char();
                self.bump_char();
                continue;
            }
            if rem.starts_with("\"\"\"") {
                self.pos += 3;
                break;
            }
            self.bump_char();
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        if self.remaining().is_empty() {
            return None;
        }

        let start = self.pos;
        let rem = self.remaining();

        let kind = if rem.starts_with("\"\"\"") {
            self.pos += 3;
            self.lex_text_block();
            TokenKind::TextBlock
        } else if let Some(&(punct, kind)) = PUNCTUATION
            .iter()
            .find(|(punct, _)| rem.starts_with(punct))
            .filter(|(punct, _)| !(*punct == "." && rem[1..].starts_with(|c: char| c.is_ascii_digit())))
        {
            self.pos += punct.len();
            kind
        } else {
            let ch = self.bump_char()?;
            match ch {
                '"' => {
                    self.lex_quoted('"');
                    TokenKind::StringLiteral
                }
                '\'' => {
                    self.lex_quoted('\'');
                    TokenKind::CharLiteral
                }
                c if c.is_ascii_digit() || c == '.' => self.lex_number(c),
                c if is_ident_start(c) => {
                    self.lex_identifier();
                    TokenKind::Ident
                }
                _ => TokenKind::Unknown,
            }
        };

        let text = self.text[start..self.pos].to_string();
        let range = Span::new(self.offset + start, self.offset + self.pos);
        Some(Token { kind, text, range })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}
