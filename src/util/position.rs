use std::fmt::{Display, Formatter};

use super::Position;

impl Position {
    /// Create a new Position object based on the line and column number.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
