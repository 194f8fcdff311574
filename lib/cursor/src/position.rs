use derive_more::Display;

/// 1-based line number in the source text.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Line(pub usize);

/// 1-based column, counted in characters.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Col(pub usize);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display(fmt = "{}:{}", line, col)]
pub struct Position {
    pub line: Line,
    pub col: Col,
}

impl Position {
    pub fn new(line: Line, col: Col) -> Self {
        Self { line, col }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: Line(1), col: Col(1) }
    }
}
