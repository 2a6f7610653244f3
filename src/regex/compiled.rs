use super::{determinise, Automaton, CompiledRegex, Matcher, NfaBuilder, PatternParser, Regex};
use once_cell::unsync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl CompiledRegex {
    /// Compile `pattern` down to a DFA. Compilation is lenient and never
    /// fails: unclosed constructs are read to the end of the pattern and
    /// unrecognised escapes stand for the escaped rune.
    pub fn new(pattern: &str) -> Self {
        let regex = PatternParser::new(pattern).parse();
        let nfa = NfaBuilder::automaton(&regex);
        let dfa = determinise(&nfa);
        Self {
            regex,
            nfa,
            dfa,
            matches_empty: OnceCell::new(),
        }
    }

    /// The surface rendering of the compiled expression. Re-compiling it
    /// yields a structurally equivalent tree.
    pub fn pattern(&self) -> String {
        self.regex.pattern()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn dfa(&self) -> &Automaton {
        &self.dfa
    }

    pub(crate) fn nfa(&self) -> &Automaton {
        &self.nfa
    }

    /// Whether the whole of `input` is accepted.
    pub fn is_match(&self, input: &str) -> bool {
        let mut state = self.dfa.start();
        for c in input.chars() {
            match self
                .dfa
                .transitions_from(state)
                .iter()
                .find(|(atom, _)| atom.matches(c))
            {
                Some((_, target)) => state = *target,
                None => return false,
            }
        }
        self.dfa.is_final(state)
    }

    /// Whether the empty string is accepted. Token types with a nullable
    /// pattern make their grammar references nullable.
    pub fn matches_empty(&self) -> bool {
        *self
            .matches_empty
            .get_or_init(|| self.dfa.is_final(self.dfa.start()))
    }

    /// A fresh stateful prefix matcher over the compiled DFA.
    pub fn matcher(self: Rc<Self>) -> Matcher {
        Matcher::new(self)
    }
}

impl Debug for CompiledRegex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRegex")
            .field("pattern", &self.pattern())
            .field("nfa_states", &self.nfa.state_count())
            .field("dfa_states", &self.dfa.state_count())
            .finish()
    }
}
