//! lang_ll is a library for tokenising and parsing textual input from
//! user-declared token patterns and an EBNF-style grammar, built on a
//! regular expression engine that matches prefixes rather than whole
//! strings.
//!
//! # Overview
//!
//! The crate is three composable engines:
//!
//! * [regex]: compiles a pattern through a Thompson NFA into a DFA whose
//!   [Matcher](regex::Matcher) consumes runes one at a time and reports
//!   after each whether the input so far is a dead end, a live prefix, or
//!   an accepted string that may still grow.
//! * [lexer]: runs one matcher per [TokenType] in parallel over a buffered
//!   reader, decoding UTF-8 across buffer boundaries, tracking line/column,
//!   and committing the longest match (earliest declaration wins ties) only
//!   when no pattern can continue. The resulting [TokenSeq] is a lazy,
//!   pushback-capable stream filtered through user [Modulator]s.
//! * [parser]: a recursive descent recogniser over a [Grammar] of
//!   [Sentence] combinators (token and production references, sequence,
//!   choice, optional, repetitions), driven by FIRST/FOLLOW sets computed
//!   lazily with cycle detection, producing a [SyntaxTree] shaped by
//!   per-sentence [Retention] tags.
//!
//! # Example
//!
//! ```
//! use lang_ll::{ignore_tokens, Grammar, Lexer, Production, Sentence, TokenType};
//!
//! let lexer = Lexer::new(vec![
//!     TokenType::simple("let"),
//!     TokenType::new("INT", "[0-9]+"),
//!     TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
//!     TokenType::simple("="),
//!     TokenType::simple(";"),
//!     TokenType::new("SPC", "[ \t\r\n]+"),
//! ])
//! .modulate(ignore_tokens(&["SPC"]));
//!
//! let grammar = Grammar::new(
//!     "assignments",
//!     lexer,
//!     vec![
//!         Production::new(
//!             "Program",
//!             Sentence::one_or_more(Sentence::rule("Stmt")),
//!         ),
//!         Production::new(
//!             "Stmt",
//!             Sentence::sequence(vec![
//!                 Sentence::token("let"),
//!                 Sentence::token("ID"),
//!                 Sentence::token("="),
//!                 Sentence::token("INT"),
//!                 Sentence::token(";"),
//!             ]),
//!         ),
//!     ],
//! );
//!
//! let tree = grammar
//!     .parse_text("let x = 1000; let y = 2000;")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(tree.children.len(), 2);
//! ```

mod error;
pub mod lexer;
pub mod parser;
pub mod regex;
pub mod seq;
mod util;

pub use lexer::{ignore_tokens, LexResult, Lexer, Modulator, Token, TokenSeq, TokenType, EMPTY, EOF};
pub use parser::{Grammar, Production, Retention, Sentence, SyntaxNode, SyntaxTree};
pub use regex::{escape, CompiledRegex, MatchKind, Matcher};
pub use util::{Log, Position};

#[derive(Debug)]
/// An error raised while lexing: unmatchable input, malformed UTF-8, or an
/// I/O failure of the underlying reader. A lex error ends its token
/// stream; the next pull returns nothing.
pub struct LexError {
    pub line: u32,
    pub column: u32,
    pub kind: LexErrorKind,
}

#[derive(Debug)]
pub enum LexErrorKind {
    /// No token type accepts the input. Carries every pattern that was
    /// still alive mid-token and what it expected next.
    NoMatch { partials: Vec<PartialTokenMatch> },
    InvalidUtf8,
    Io(std::io::Error),
}

#[derive(Debug, Clone)]
/// One live-but-unfinished pattern at the point lexing failed: the text it
/// had accepted and the renderings of the atoms that could have extended
/// it.
pub struct PartialTokenMatch {
    pub id: String,
    pub matched: String,
    pub expecting: Vec<String>,
}

#[derive(Debug, Clone)]
/// An error raised while recognising the token stream against the grammar:
/// the offending token was not in the FIRST set of any viable construct.
pub struct SyntaxError {
    pub position: Option<Position>,
    pub message: String,
}

#[derive(Debug, Clone)]
/// An error in the grammar itself, e.g. a FIRST/FOLLOW traversal
/// re-entering an element already on the stack, or a reference to an
/// unknown production.
pub struct GrammarError {
    pub message: String,
}

#[derive(Debug)]
/// Everything [Grammar::parse](parser::Grammar::parse) can fail with. No
/// error is swallowed and none triggers a retry; parsing stops at the
/// first one.
pub enum ParseError {
    Lex(LexError),
    Syntax(SyntaxError),
    Grammar(GrammarError),
}
