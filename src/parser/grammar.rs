use super::{CycleDetector, Grammar, Production, Retention, Sentence, SyntaxTree};
use crate::lexer::Lexer;
use crate::util::Log;
use crate::{GrammarError, ParseError};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::rc::Rc;

impl Production {
    pub fn new(name: impl Into<String>, sentence: Sentence) -> Self {
        Self {
            name: name.into(),
            sentence,
            retention: Retention::default(),
            follow: OnceCell::new(),
            follow_guard: Cell::new(false),
        }
    }

    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn get_retention(&self) -> Retention {
        self.retention
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.sentence)
    }
}

impl Grammar {
    /// Create a grammar over `lexer`. The first production is the default
    /// start.
    pub fn new(id: impl Into<String>, lexer: Lexer, productions: Vec<Production>) -> Self {
        let productions: Vec<Rc<Production>> = productions.into_iter().map(Rc::new).collect();
        let by_name = productions
            .iter()
            .map(|p| (p.name.clone(), Rc::clone(p)))
            .collect();
        Self {
            id: id.into(),
            lexer: Rc::new(lexer),
            productions,
            by_name,
            debug: OnceCell::new(),
        }
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn productions(&self) -> &[Rc<Production>] {
        &self.productions
    }

    pub(crate) fn find(&self, name: &str) -> Option<&Rc<Production>> {
        self.by_name.get(name)
    }

    /// Set a log label to debug the parse based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Parse `reader` starting from the first production. `Ok(None)` means
    /// the start production matched the empty string.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Option<SyntaxTree>, ParseError> {
        let start = self.productions.first().ok_or_else(|| {
            ParseError::Grammar(GrammarError::new(format!(
                "grammar {:?} has no productions",
                self.id
            )))
        })?;
        self.parse_from(reader, start)
    }

    /// Parse `reader` starting from the named production.
    pub fn parse_production<R: Read>(
        &self,
        reader: R,
        start_from: &str,
    ) -> Result<Option<SyntaxTree>, ParseError> {
        let start = self.find(start_from).ok_or_else(|| {
            ParseError::Grammar(GrammarError::new(format!(
                "could not find production {:?}",
                start_from
            )))
        })?;
        self.parse_from(reader, start)
    }

    /// Parse an in-memory string starting from the first production.
    pub fn parse_text(&self, input: &str) -> Result<Option<SyntaxTree>, ParseError> {
        self.parse(input.as_bytes())
    }

    /// Parse an in-memory string starting from the named production.
    pub fn parse_text_production(
        &self,
        input: &str,
        start_from: &str,
    ) -> Result<Option<SyntaxTree>, ParseError> {
        self.parse_production(input.as_bytes(), start_from)
    }

    fn parse_from<R: Read>(
        &self,
        reader: R,
        start: &Rc<Production>,
    ) -> Result<Option<SyntaxTree>, ParseError> {
        let mut tokens = self.lexer.lex(reader);
        let mut cd = CycleDetector::new();
        let result = start.recognise(self, &mut tokens, &mut cd);

        #[cfg(debug_assertions)]
        if let Some(debug) = self.debug.get() {
            match &result {
                Ok(_) => {
                    if debug.order() >= Log::Success(()).order() {
                        println!("[{}; parse success from {:?}]", debug, start.name);
                    }
                }
                Err(err) => {
                    if debug.order() >= Log::Result(()).order() {
                        println!("[{}; parse failed]: {}", debug, err);
                    }
                }
            }
        }

        tokens.stop();
        result
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "grammar {} {{", self.id)?;
        for production in &self.productions {
            writeln!(f, "{:>4}{}", "", production)?;
        }
        write!(f, "}}")
    }
}
