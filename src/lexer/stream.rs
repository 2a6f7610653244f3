use super::{Lexer, LexResult, Modulator, Scanner, Token, TokenSeq, TokenType};
use crate::seq::{Pushback, UntilError};
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::collections::VecDeque;
use std::io::Read;
use std::rc::Rc;

impl Lexer {
    /// Create a lexer from token-type definitions. Declaration order is
    /// priority order: when two types accept the same text, the earlier one
    /// wins.
    pub fn new(types: Vec<TokenType>) -> Self {
        Self {
            types: types.into_iter().map(Rc::new).collect(),
            modulators: Vec::new(),
            buffer_size: 1024,
            debug: OnceCell::new(),
        }
    }

    /// Set the read buffer size in bytes. Sizes below 8 are raised to 8 so
    /// that any UTF-8 rune plus carry-over always fits.
    pub fn buffer(mut self, size: usize) -> Self {
        self.buffer_size = size.max(8);
        self
    }

    /// Append a modulator to the chain. Modulators run left to right in
    /// installation order.
    pub fn modulate(mut self, modulator: Modulator) -> Self {
        self.modulators.push(modulator);
        self
    }

    /// Set a log label to debug the lexer based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn token_types(&self) -> &[Rc<TokenType>] {
        &self.types
    }

    /// Look up a token type by id.
    pub fn token_type(&self, id: &str) -> Option<&Rc<TokenType>> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Lex `reader` into a lazy token stream. The stream owns the reader;
    /// each call builds fresh matchers, so one lexer can serve many inputs.
    pub fn lex<R: Read>(&self, reader: R) -> TokenSeq<R> {
        let debug = self.debug.get().copied().unwrap_or(Log::None);
        let modulated = Modulated {
            scan: Scanner::new(reader, &self.types, self.buffer_size, debug),
            modulators: self.modulators.clone(),
            pending: VecDeque::new(),
        };
        TokenSeq {
            inner: Pushback::new(UntilError::new(modulated)),
        }
    }
}

/// The raw scanner output threaded through the modulator chain: each item
/// flat-maps to zero or more items per modulator, in installation order.
pub(crate) struct Modulated<R: Read> {
    scan: Scanner<R>,
    modulators: Vec<Modulator>,
    pending: VecDeque<LexResult>,
}

impl<R: Read> Iterator for Modulated<R> {
    type Item = LexResult;

    fn next(&mut self) -> Option<LexResult> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            let raw = self.scan.next_item()?;
            let mut items = vec![raw];
            for modulator in &self.modulators {
                items = items.into_iter().flat_map(|item| modulator(item)).collect();
            }
            self.pending.extend(items);
        }
    }
}

impl<R: Read> TokenSeq<R> {
    /// Push `token` back onto the stream; the next pull returns it before
    /// anything else. Pushbacks stack LIFO.
    pub fn push_back(&mut self, token: Token) {
        self.inner.push_back(Ok(token));
    }

    /// Release the reader and matchers. Dropping the sequence does the
    /// same; this spelling marks early exits.
    pub fn stop(self) {}
}

impl<R: Read> Iterator for TokenSeq<R> {
    type Item = LexResult;

    fn next(&mut self) -> Option<LexResult> {
        self.inner.next()
    }
}
