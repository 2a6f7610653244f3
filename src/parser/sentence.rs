use super::{Retention, Sentence};
use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

impl Sentence {
    /// A terminal matching one token by type id.
    pub fn token(id: impl Into<String>) -> Self {
        Sentence::Token {
            id: id.into(),
            retention: Retention::default(),
        }
    }

    /// A reference to the named production.
    pub fn rule(name: impl Into<String>) -> Self {
        Sentence::Rule {
            name: name.into(),
            retention: Retention::default(),
        }
    }

    pub fn sequence(elements: Vec<Sentence>) -> Self {
        Sentence::Sequence {
            elements,
            retention: Retention::default(),
            first: OnceCell::new(),
        }
    }

    pub fn choice(alternates: Vec<Sentence>) -> Self {
        Sentence::Choice {
            alternates,
            retention: Retention::default(),
            first: OnceCell::new(),
        }
    }

    pub fn optional(sentence: Sentence) -> Self {
        Sentence::Optional {
            sentence: Box::new(sentence),
            retention: Retention::default(),
        }
    }

    pub fn zero_or_more(sentence: Sentence) -> Self {
        Sentence::ZeroOrMore {
            sentence: Box::new(sentence),
            retention: Retention::default(),
        }
    }

    pub fn one_or_more(sentence: Sentence) -> Self {
        Sentence::OneOrMore {
            sentence: Box::new(sentence),
            retention: Retention::default(),
        }
    }

    /// Between `min` and `max` repetitions of `sentence`.
    pub fn repeat(sentence: Sentence, min: usize, max: usize) -> Self {
        Sentence::Repeat {
            sentence: Box::new(sentence),
            min,
            max,
            retention: Retention::default(),
            first: OnceCell::new(),
        }
    }

    /// Set the retention tag deciding how the matched subtree appears in
    /// the output tree.
    pub fn retention(mut self, retention: Retention) -> Self {
        *self.retention_mut() = retention;
        self
    }

    /// Shorthand for tagging the sentence with [Retention::Drop].
    pub fn dropped(self) -> Self {
        self.retention(Retention::Drop)
    }

    pub fn get_retention(&self) -> Retention {
        match self {
            Sentence::Token { retention, .. }
            | Sentence::Rule { retention, .. }
            | Sentence::Sequence { retention, .. }
            | Sentence::Choice { retention, .. }
            | Sentence::Optional { retention, .. }
            | Sentence::ZeroOrMore { retention, .. }
            | Sentence::OneOrMore { retention, .. }
            | Sentence::Repeat { retention, .. } => *retention,
        }
    }

    fn retention_mut(&mut self) -> &mut Retention {
        match self {
            Sentence::Token { retention, .. }
            | Sentence::Rule { retention, .. }
            | Sentence::Sequence { retention, .. }
            | Sentence::Choice { retention, .. }
            | Sentence::Optional { retention, .. }
            | Sentence::ZeroOrMore { retention, .. }
            | Sentence::OneOrMore { retention, .. }
            | Sentence::Repeat { retention, .. } => retention,
        }
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentence::Token { id, .. } => write!(f, "{}", id),
            Sentence::Rule { name, .. } => write!(f, "{}", name),
            Sentence::Sequence { elements, .. } => {
                for (index, e) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            Sentence::Choice { alternates, .. } => {
                for (index, a) in alternates.iter().enumerate() {
                    if index > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", a)?;
                }
                Ok(())
            }
            Sentence::Optional { sentence, .. } => write!(f, "({})?", sentence),
            Sentence::ZeroOrMore { sentence, .. } => write!(f, "({})*", sentence),
            Sentence::OneOrMore { sentence, .. } => write!(f, "({})+", sentence),
            Sentence::Repeat {
                sentence, min, max, ..
            } => write!(f, "({}){{{},{}}}", sentence, min, max),
        }
    }
}
