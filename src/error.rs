use crate::{GrammarError, LexError, LexErrorKind, ParseError, Position, SyntaxError};
use std::fmt::{Display, Formatter};

impl LexError {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LexErrorKind::NoMatch { partials } => {
                write!(f, "no token matches input at {}", self.position())?;
                for p in partials {
                    write!(
                        f,
                        "; {} matched {:?} expecting {}",
                        p.id,
                        p.matched,
                        p.expecting.join(" or ")
                    )?;
                }
                Ok(())
            }
            LexErrorKind::InvalidUtf8 => {
                write!(f, "invalid UTF-8 in input at {}", self.position())
            }
            LexErrorKind::Io(err) => write!(f, "read failed at {}: {}", self.position(), err),
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            LexErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl SyntaxError {
    pub fn new(position: Option<Position>, message: String) -> Self {
        Self { position, message }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "SyntaxError at {}: {}", position, self.message),
            None => write!(f, "SyntaxError: {}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl GrammarError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}", self.message)
    }
}

impl std::error::Error for GrammarError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::Syntax(err) => write!(f, "{}", err),
            ParseError::Grammar(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(err) => Some(err),
            ParseError::Syntax(err) => Some(err),
            ParseError::Grammar(err) => Some(err),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<GrammarError> for ParseError {
    fn from(err: GrammarError) -> Self {
        ParseError::Grammar(err)
    }
}
