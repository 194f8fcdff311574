use cursor::Cursor;
use errors::{LoxError, LoxErrors};

pub mod token;
pub use token::{Literal, Token, TokenKind};

use TokenKind::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

/// Turns source text into a token vector that always ends with [`TokenKind::Eof`].
pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: LoxErrors,
}

/// Scans `source` in one go.
pub fn scan(source: &str) -> Result<Vec<Token<'_>>, LoxErrors> {
    Scanner::new(source).scan_tokens()
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            errors: LoxErrors::default(),
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token<'a>>, LoxErrors> {
        loop {
            self.start = self.cursor.clone();
            let Some(c) = self.cursor.next() else { break };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => {
                    let kind = if self.cursor.eat('=') { BangEqual } else { Bang };
                    self.add_token(kind)
                }
                '=' => {
                    let kind = if self.cursor.eat('=') { EqualEqual } else { Equal };
                    self.add_token(kind)
                }
                '<' => {
                    let kind = if self.cursor.eat('=') { LessEqual } else { Less };
                    self.add_token(kind)
                }
                '>' => {
                    let kind = if self.cursor.eat('=') { GreaterEqual } else { Greater };
                    self.add_token(kind)
                }

                '/' => {
                    if self.cursor.eat('/') {
                        // Comment
                        self.cursor.eat_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),
                d if d.is_ascii_digit() => self.number(),
                c if is_identifier_start(c) => self.identifier(),

                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanError::UnexpectedCharacter(c)),
            }
        }

        self.start = self.cursor.clone();
        self.add_token(Eof);

        log::debug!("scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn add_token(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.lexeme(), self.start.position());
        self.push(token);
    }

    fn push(&mut self, token: Token<'a>) {
        log::trace!("{:?} {:?} at {}", token.kind, token.lexeme, token.position());
        self.tokens.push(token);
    }

    fn error(&mut self, error: ScanError) {
        self.errors.push(LoxError::new(self.start.position(), error.to_string()));
    }

    fn string(&mut self) {
        self.cursor.eat_while(|c| c != '"');
        if !self.cursor.eat('"') {
            self.error(ScanError::UnterminatedString);
            return;
        }

        let lexeme = self.lexeme();
        let value = &lexeme[1..lexeme.len() - 1];
        let token = Token::new(Str, lexeme, self.start.position());
        self.push(token.with_literal(Literal::Str(value)));
    }

    fn number(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.lexeme();
        // Digits with an optional fraction always parse as f64.
        let value = lexeme.parse().unwrap_or_default();
        let token = Token::new(Number, lexeme, self.start.position());
        self.push(token.with_literal(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        self.cursor.eat_while(|c| is_identifier_start(c) || c.is_ascii_digit());
        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(Identifier);
        self.add_token(kind);
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
