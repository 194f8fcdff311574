use cursor::{Col, Line};
use errors::LoxError;
use scanner::Token;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error (l. {line}, c. {col}): {error}")]
pub struct ParserError {
    pub error: ParserErrorType,
    pub line: Line,
    pub col: Col,
}

impl ParserError {
    /// An error reported at the position of `token`.
    pub fn new(error: ParserErrorType, token: &Token) -> Self {
        Self { error, line: token.line, col: token.col }
    }
}

impl From<ParserError> for LoxError {
    fn from(error: ParserError) -> Self {
        LoxError { line: error.line, col: error.col, message: error.error.to_string() }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expect ')' after expression.")]
    MissingRightParen,
    #[error("Expect ';' after value.")]
    ExpectedSemicolonAfterValue,
    #[error("Expect ';' after expression.")]
    ExpectedSemicolonAfterExpression,
    #[error("Expect end of expression.")]
    ExpectedEndOfExpression,
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("Expression nests more than {0} levels deep.")]
    TooDeeplyNested(usize),
}
