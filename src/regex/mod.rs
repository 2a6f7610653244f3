//! A regular expression engine built for prefix matching.
//!
//! A pattern is parsed into a [Regex] tree, compiled to a non-deterministic
//! finite automaton (Thompson construction) and then to a deterministic one
//! (subset construction). The resulting [CompiledRegex] can answer whole-string
//! membership through [is_match](CompiledRegex::is_match), but its main client
//! is the [Matcher]: a stateful consumer of runes which reports after every
//! rune whether the input seen so far is a dead end ([MatchKind::NoMatch]), a
//! live prefix of the language ([MatchKind::PartialMatch]) or an accepted
//! string which may still be extended ([MatchKind::FullMatch]). The tri-state
//! report is what lets the lexer run many patterns in parallel and commit to
//! the longest token only when no pattern can continue.
//!
//! Parsing is lenient: unclosed groups, classes and repetitions are read to
//! the end of the pattern, an unrecognised escape stands for the escaped rune
//! itself, and no pattern ever fails to compile.

mod atom;
mod compiled;
mod dfa;
mod matcher;
mod nfa;
mod parser;
mod pattern;
mod span;

#[cfg(test)]
mod __tests__;

use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub(crate) use dfa::determinise;
pub(crate) use nfa::NfaBuilder;
pub(crate) use parser::PatternParser;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// An inclusive range of runes.
pub struct Span {
    pub from: char,
    pub to: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// An ordered union of inclusive rune ranges.
///
/// Span sets enumerate what an [Atom] can match. They are used to render the
/// expected continuations in lexing diagnostics and to invert excluding
/// character sets against the matching universe.
pub struct SpanSet(pub(crate) Vec<Span>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Modifier flags set by `(?i)` and `(?u)` groups. A flag applies to every
/// atom created after it within the enclosing group.
pub struct Modifiers {
    pub case_insensitive: bool,
    pub unicode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The shape of a character atom.
pub enum AtomKind {
    /// The ε label; only ever appears on NFA transitions.
    Empty,
    /// `.`: any rune within the matching universe.
    Any,
    /// A single rune.
    Char(char),
    /// An inclusive rune range, e.g. `a-z` inside a class.
    Range(char, char),
    /// A character class `[...]`, possibly excluding (`[^...]`).
    Set { exclude: bool, members: Vec<Atom> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A character atom: the label of an automaton transition.
///
/// Besides its [AtomKind] an atom carries the modifier flags active at its
/// position in the pattern and its capture-group path: the ordered list of
/// capture-group numbers enclosing it, starting with the root group 0.
pub struct Atom {
    kind: AtomKind,
    modifiers: Modifiers,
    groups: Vec<u32>,
    label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The syntax tree of a parsed regular expression.
pub enum Regex {
    Atom(Atom),
    /// A `(?...)` modifier group. Contributes no atoms; kept in the tree so
    /// that the pattern rendering round-trips.
    Flags(String),
    Choice(Box<Regex>, Box<Regex>),
    Sequence(Vec<Regex>),
    ZeroOrOne(Box<Regex>),
    ZeroOrMore(Box<Regex>),
    OneOrMore(Box<Regex>),
    Repeat { re: Box<Regex>, min: u8, max: u8 },
    /// A capture group `(...)`. Numbering happens during parsing; the atoms
    /// inside already carry their group paths.
    Group(Box<Regex>),
}

/// A state handle: an index into the owning automaton's transition table.
pub(crate) type StateId = usize;

#[derive(Debug, Clone)]
/// A finite automaton over [Atom] labelled transitions. NFAs use ε edges
/// (the [AtomKind::Empty] atom); DFAs are ε-free with per-state atoms that
/// are disjoint for distinct pattern texts.
pub(crate) struct Automaton {
    transitions: Vec<Vec<(Atom, StateId)>>,
    start: StateId,
    finals: Vec<StateId>,
}

/// A regular expression compiled down to a DFA.
///
/// Compilation happens once; the compiled value is immutable afterwards and
/// is shared by reference by every [Matcher] derived from it.
pub struct CompiledRegex {
    regex: Regex,
    nfa: Automaton,
    dfa: Automaton,
    matches_empty: OnceCell<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The state of a [Matcher] after consuming a rune.
pub enum MatchKind {
    /// No rune consumed since the last reset.
    Start,
    /// The consumed runes cannot be extended into an accepted string. The
    /// matcher must be reset before further input.
    NoMatch,
    /// The consumed runes are a proper prefix of some accepted string.
    PartialMatch,
    /// The consumed runes are an accepted string; more input may still be
    /// accepted since the final state can have outgoing transitions.
    FullMatch,
}

/// A stateful consumer of runes against a compiled DFA.
///
/// A matcher accumulates the text consumed since the last [reset](Matcher::reset).
/// Capture-group text is threaded per live NFA state alongside the DFA
/// walk, so that once an alternative dies its groups are no longer
/// reported. Matchers are cheap; a lexer keeps one per token type.
pub struct Matcher {
    compiled: Rc<CompiledRegex>,
    state: StateId,
    last: MatchKind,
    matched: String,
    captures: Vec<(StateId, BTreeMap<u32, String>)>,
}

/// Escape every regex metacharacter in `s` so that the result matches `s`
/// literally.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '+' | '*' | '?'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
