//! The scanning engine: a buffered reader decoded rune by rune, driving
//! every token-type matcher in parallel.
//!
//! Per rune the scanner snapshots which matchers are currently in a full
//! match, then advances every live matcher. While at least one matcher can
//! still move the rune is consumed; when none can, the snapshot names the
//! token to commit (earliest declared full match wins) and the rune is left
//! in place to start the next token. A full match is therefore only
//! committed once every possible extension has been exhausted.

use super::{Token, TokenType, EOF};
use crate::regex::{MatchKind, Matcher};
use crate::util::Log;
use crate::{LexError, LexErrorKind, PartialTokenMatch};
use std::io::Read;
use std::rc::Rc;

pub(crate) struct TokenMatcher {
    def: Rc<TokenType>,
    matcher: Matcher,
}

enum ScanState {
    /// Producing tokens from the input.
    Lexing,
    /// Input exhausted and final token emitted; the EOF token is next.
    Ended,
    /// EOF token or an error emitted; the sequence is terminal.
    Finished,
}

pub(crate) struct Scanner<R: Read> {
    reader: R,
    matchers: Vec<TokenMatcher>,
    buf: Vec<u8>,
    cursor: usize,
    filled: usize,
    reader_done: bool,
    line: u32,
    column: u32,
    token_line: u32,
    token_column: u32,
    state: ScanState,
    debug: Log<&'static str>,
}

impl<R: Read> Scanner<R> {
    pub fn new(
        reader: R,
        types: &[Rc<TokenType>],
        buffer_size: usize,
        debug: Log<&'static str>,
    ) -> Self {
        let matchers = types
            .iter()
            .map(|def| TokenMatcher {
                def: Rc::clone(def),
                matcher: Matcher::new(Rc::clone(def.compiled())),
            })
            .collect();
        Self {
            reader,
            matchers,
            buf: vec![0; buffer_size],
            cursor: 0,
            filled: 0,
            reader_done: false,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
            state: ScanState::Lexing,
            debug,
        }
    }

    pub fn next_item(&mut self) -> Option<Result<Token, LexError>> {
        match self.state {
            ScanState::Finished => None,
            ScanState::Ended => {
                self.state = ScanState::Finished;
                Some(Ok(self.log(Token::new(EOF, "", self.line, self.column))))
            }
            ScanState::Lexing => self.lex(),
        }
    }

    fn lex(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            let rune = match self.decode() {
                Ok(r) => r,
                Err(e) => {
                    self.state = ScanState::Finished;
                    return Some(Err(e));
                }
            };

            match rune {
                None => {
                    // end of input: snapshot the matcher states one last
                    // time and emit the pending token before EOF
                    if self
                        .matchers
                        .iter()
                        .all(|m| matches!(m.matcher.last_match(), MatchKind::Start))
                    {
                        self.state = ScanState::Finished;
                        return Some(Ok(self.log(Token::new(EOF, "", self.line, self.column))));
                    }
                    let fulls = self.in_state(MatchKind::FullMatch);
                    let produced = self.produce(&fulls);
                    self.state = if produced.is_ok() {
                        ScanState::Ended
                    } else {
                        ScanState::Finished
                    };
                    return Some(produced);
                }
                Some((c, width)) => {
                    let fulls = self.in_state(MatchKind::FullMatch);
                    let mut still_matching = 0;
                    for m in &mut self.matchers {
                        if m.matcher.last_match() != MatchKind::NoMatch
                            && m.matcher.match_next(c) != MatchKind::NoMatch
                        {
                            still_matching += 1;
                        }
                    }
                    if still_matching == 0 {
                        // the current rune starts the next token; commit
                        // without consuming it
                        let produced = self.produce(&fulls);
                        if produced.is_err() {
                            self.state = ScanState::Finished;
                        }
                        return Some(produced);
                    }
                    self.cursor += width;
                    if c == '\n' {
                        self.line += 1;
                        self.column = 1;
                    } else {
                        self.column += 1;
                    }
                }
            }
        }
    }

    /// The indices of the matchers currently in `state`, in declaration
    /// order.
    fn in_state(&self, state: MatchKind) -> Vec<usize> {
        self.matchers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.matcher.last_match() == state)
            .map(|(index, _)| index)
            .collect()
    }

    /// Commit the token recognised by the first full matcher, or fail with
    /// a diagnostic listing every partial match and the runes that could
    /// have extended it. Either way all matchers reset and the next token
    /// starts at the current position.
    fn produce(&mut self, fulls: &[usize]) -> Result<Token, LexError> {
        let result = match fulls.first() {
            Some(&index) => {
                let m = &self.matchers[index];
                Ok(self.log(Token::new(
                    &m.def.id,
                    m.matcher.matched(),
                    self.token_line,
                    self.token_column,
                )))
            }
            None => {
                let partials = self
                    .matchers
                    .iter()
                    .filter(|m| {
                        matches!(
                            m.matcher.last_match(),
                            MatchKind::PartialMatch | MatchKind::NoMatch
                        ) && !m.matcher.matched().is_empty()
                    })
                    .map(|m| PartialTokenMatch {
                        id: m.def.id.clone(),
                        matched: m.matcher.matched().to_string(),
                        expecting: m.matcher.expecting(),
                    })
                    .collect();
                Err(LexError {
                    line: self.token_line,
                    column: self.token_column,
                    kind: LexErrorKind::NoMatch { partials },
                })
            }
        };
        for m in &mut self.matchers {
            m.matcher.reset();
        }
        self.token_line = self.line;
        self.token_column = self.column;
        result
    }

    /// Decode the rune at the cursor, refilling the buffer as needed.
    /// `Ok(None)` is end of input. The cursor is not advanced.
    fn decode(&mut self) -> Result<Option<(char, usize)>, LexError> {
        loop {
            if self.cursor >= self.filled {
                if self.reader_done {
                    return Ok(None);
                }
                self.refill()?;
                continue;
            }
            let window_end = (self.cursor + 4).min(self.filled);
            let window = &self.buf[self.cursor..window_end];
            match std::str::from_utf8(window) {
                Ok(s) => {
                    let c = s.chars().next().expect("non-empty utf-8 window");
                    return Ok(Some((c, c.len_utf8())));
                }
                Err(e) if e.valid_up_to() > 0 => {
                    let s = unsafe { std::str::from_utf8_unchecked(&window[..e.valid_up_to()]) };
                    let c = s.chars().next().expect("non-empty valid prefix");
                    return Ok(Some((c, c.len_utf8())));
                }
                Err(e) if e.error_len().is_none() && !self.reader_done => {
                    // a rune split across reads: carry the trailing bytes
                    // into the next refill
                    self.refill()?;
                }
                Err(_) => {
                    return Err(LexError {
                        line: self.line,
                        column: self.column,
                        kind: LexErrorKind::InvalidUtf8,
                    });
                }
            }
        }
    }

    /// Move the unread leftover to the front of the buffer and read more
    /// bytes behind it.
    fn refill(&mut self) -> Result<(), LexError> {
        self.buf.copy_within(self.cursor..self.filled, 0);
        self.filled -= self.cursor;
        self.cursor = 0;
        match self.reader.read(&mut self.buf[self.filled..]) {
            Ok(0) => {
                self.reader_done = true;
                Ok(())
            }
            Ok(n) => {
                self.filled += n;
                Ok(())
            }
            Err(e) => {
                self.reader_done = true;
                Err(LexError {
                    line: self.line,
                    column: self.column,
                    kind: LexErrorKind::Io(e),
                })
            }
        }
    }

    fn log(&self, token: Token) -> Token {
        #[cfg(debug_assertions)]
        if self.debug.order() >= Log::Success(()).order() {
            println!("[{}; token]: {}", self.debug, token);
        }
        token
    }
}
