//! Tokenizer for MiniLang source. Identifiers, the ten reserved words,
//! numbers, and the fixed punctuation/operator set, scanned directly off
//! the byte slice — no generated-table lexer is worth depending on for a
//! grammar this small.

use crate::error::{MiniLangError, Result, SourcePos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Number(i64),

    Plus,
    Minus,
    Times,
    LParen,
    RParen,
    Assign,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    Concat,

    If,
    Then,
    Else,
    Fi,
    While,
    Do,
    Od,
    Define,
    Proc,
    End,

    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: SourcePos,
}

/// Maps an identifier spelling to its reserved-word token.
fn reserved(word: &str) -> Option<TokenKind> {
    Some(match word {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "fi" => TokenKind::Fi,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "od" => TokenKind::Od,
        "define" => TokenKind::Define,
        "proc" => TokenKind::Proc,
        "end" => TokenKind::End,
        _ => return None,
    })
}

pub struct Lexer<'a> {
    src: &'a [u8],
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> SourcePos {
        SourcePos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.offset).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.src.get(self.offset + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.offset += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        // The grammar has no comment syntax; only whitespace is ignored.
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.bump();
        }
    }

    /// Scans and returns the next token, or `TokenKind::Eof` at the end of
    /// input. Errors report the offending character and its position.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        let pos = self.pos();

        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        let kind = match c {
            b'+' => {
                self.bump();
                TokenKind::Plus
            }
            b'-' => {
                self.bump();
                TokenKind::Minus
            }
            b'*' => {
                self.bump();
                TokenKind::Times
            }
            b'(' => {
                self.bump();
                TokenKind::LParen
            }
            b')' => {
                self.bump();
                TokenKind::RParen
            }
            b';' => {
                self.bump();
                TokenKind::Semicolon
            }
            b',' => {
                self.bump();
                TokenKind::Comma
            }
            b'[' => {
                self.bump();
                TokenKind::LBracket
            }
            b']' => {
                self.bump();
                TokenKind::RBracket
            }
            b':' if self.peek2() == Some(b'=') => {
                self.bump();
                self.bump();
                TokenKind::Assign
            }
            b'|' if self.peek2() == Some(b'|') => {
                self.bump();
                self.bump();
                TokenKind::Concat
            }
            b'0'..=b'9' => self.lex_number(),
            b'a'..=b'z' => self.lex_ident_or_keyword(),
            other => {
                return Err(MiniLangError::Parse {
                    message: format!("unexpected character '{}'", other as char),
                    pos,
                })
            }
        };

        Ok(Token { kind, pos })
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.offset;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        let text = std::str::from_utf8(&self.src[start..self.offset]).expect("ascii digits");
        // NUMBER is unsigned digits; overflow of i64 here is a lexical
        // concern distinct from the runtime wrap-around arithmetic `+`/`-`/`*` use.
        let n: i64 = text.parse().unwrap_or(i64::MAX);
        TokenKind::Number(n)
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.offset;
        while matches!(self.peek(), Some(b'a'..=b'z')) {
            self.bump();
        }
        let text = std::str::from_utf8(&self.src[start..self.offset]).expect("ascii letters").to_string();
        reserved(&text).unwrap_or(TokenKind::Ident(text))
    }
}
