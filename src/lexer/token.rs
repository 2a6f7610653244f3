use super::{Token, TokenType, EOF};
use crate::regex::{escape, CompiledRegex};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }

    pub fn position(&self) -> crate::Position {
        crate::Position::new(self.line, self.column)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {:?}, {}:{})",
            self.kind, self.text, self.line, self.column
        )
    }
}

impl TokenType {
    /// Define a token type from an id and a pattern. The pattern always
    /// compiles; surface-syntax leniency is the regex engine's.
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = Rc::new(CompiledRegex::new(&pattern));
        Self {
            id: id.into(),
            pattern,
            compiled,
        }
    }

    /// A token type matching its id literally: `simple("let")` is
    /// `new("let", escape("let"))`.
    pub fn simple(id: impl Into<String>) -> Self {
        let id = id.into();
        let pattern = escape(&id);
        Self::new(id, pattern)
    }

    pub fn compiled(&self) -> &Rc<CompiledRegex> {
        &self.compiled
    }
}

impl Debug for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenType")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .finish()
    }
}
