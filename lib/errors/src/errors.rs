use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::{Col, Line, Position};
use itertools::Itertools;

/// A diagnostic pinned to a place in the source.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("error (l. {line}, c. {col}): {message}")]
pub struct LoxError {
    pub line: Line,
    pub col: Col,
    pub message: String,
}

impl LoxError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self { line: position.line, col: position.col, message: message.into() }
    }
}

/// Every diagnostic reported by one scan or parse, in source order.
#[derive(thiserror::Error, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl FromIterator<LoxError> for LoxErrors {
    fn from_iter<I: IntoIterator<Item = LoxError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
