//! A streaming lexer driven by prefix-matching regular expressions.
//!
//! A [Lexer] is an ordered list of [TokenType] definitions; declaration
//! order is priority order. Lexing runs one [Matcher](crate::regex::Matcher)
//! per token type in parallel over a buffered reader and commits a token
//! only when no matcher can consume the next rune: the longest accepted
//! prefix wins (maximal munch), with ties broken by declaration order.
//!
//! The input is read through a byte buffer (default 1024 bytes, minimum 8)
//! and decoded as UTF-8; a rune split across two reads is carried over to
//! the next refill, so tokens and their line/column positions are identical
//! for every buffer size. Tokens flow through an optional chain of
//! [Modulator]s before they reach the caller.

mod modulator;
mod scan;
mod stream;
mod token;

#[cfg(test)]
mod __tests__;

use crate::regex::CompiledRegex;
use crate::seq::{Pushback, UntilError};
use crate::util::Log;
use crate::LexError;
use once_cell::unsync::OnceCell;
use std::io::Read;
use std::rc::Rc;

pub use modulator::ignore_tokens;
pub(crate) use scan::Scanner;
pub(crate) use stream::Modulated;

/// The token id of the synthetic token closing every token stream.
pub const EOF: &str = "Ω";

/// A token id reserved for modulators that need a placeholder token.
pub const EMPTY: &str = "∅";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A token produced by the lexer: its token-type id, its text and the
/// line/column of its first rune (both 1-based).
pub struct Token {
    pub kind: String,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

/// A token definition: an id and the regular expression recognising it.
pub struct TokenType {
    pub id: String,
    pub pattern: String,
    compiled: Rc<CompiledRegex>,
}

/// One item of the lexed stream: a token, or the error that ended it.
pub type LexResult = Result<Token, LexError>;

/// A user function mapping one stream item to zero or more items; the
/// modulator chain is flat-mapped over the token stream in installation
/// order. Returning an empty vec drops the item. A modulator may buffer
/// items internally (behind a `RefCell`) until it sees the [EOF] token,
/// which enables whole-stream reorderings.
pub type Modulator = Rc<dyn Fn(LexResult) -> Vec<LexResult>>;

/// A lexer: token-type definitions in priority order plus a modulator
/// chain, reusable over any number of input readers.
pub struct Lexer {
    types: Vec<Rc<TokenType>>,
    modulators: Vec<Modulator>,
    buffer_size: usize,
    debug: OnceCell<Log<&'static str>>,
}

/// The lazy token stream over one input reader.
///
/// `TokenSeq` owns the reader and the matcher array; dropping it (or the
/// consuming [stop](TokenSeq::stop)) releases them. The sequence is pulled
/// through [Iterator]; it ends after the [EOF] token, or immediately after
/// the first error item. [push_back](TokenSeq::push_back) prepends a token
/// so the next pull returns it; stacked pushbacks come back LIFO.
pub struct TokenSeq<R: Read> {
    inner: Pushback<UntilError<Modulated<R>>>,
}
