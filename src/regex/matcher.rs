use super::{CompiledRegex, MatchKind, Matcher, StateId};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl Matcher {
    pub fn new(compiled: Rc<CompiledRegex>) -> Self {
        let state = compiled.dfa().start();
        let captures = initial_captures(&compiled);
        Self {
            compiled,
            state,
            last: MatchKind::Start,
            matched: String::new(),
            captures,
        }
    }

    /// Return the matcher to its start state, clearing the accumulated text
    /// and capture groups.
    pub fn reset(&mut self) {
        self.state = self.compiled.dfa().start();
        self.last = MatchKind::Start;
        self.matched.clear();
        self.captures = initial_captures(&self.compiled);
    }

    /// Consume one rune. At most one outgoing atom of the current state can
    /// match `c` (atoms are fused by pattern during determinisation), so the
    /// first match is the transition.
    ///
    /// Once `NoMatch` is reported the matcher stays dead until the next
    /// [reset](Matcher::reset): the state and accumulated text are left at
    /// the last live position, which is what diagnostics report from.
    pub fn match_next(&mut self, c: char) -> MatchKind {
        if self.last == MatchKind::NoMatch {
            return MatchKind::NoMatch;
        }
        let dfa = self.compiled.dfa();
        let transition = dfa
            .transitions_from(self.state)
            .iter()
            .find(|(atom, _)| atom.matches(c))
            .map(|(_, target)| (*target, dfa.is_final(*target)));
        match transition {
            Some((target, is_final)) => {
                self.matched.push(c);
                self.advance_captures(c);
                self.state = target;
                self.last = if is_final {
                    MatchKind::FullMatch
                } else {
                    MatchKind::PartialMatch
                };
            }
            None => self.last = MatchKind::NoMatch,
        }
        self.last
    }

    /// Step the per-path capture maps: every live NFA state takes its
    /// matching edges, appending `c` to the groups on that edge, and the
    /// results propagate through ε closures. A state reached by several
    /// paths keeps the first; a path that takes no edge drops out, taking
    /// its groups with it.
    fn advance_captures(&mut self, c: char) {
        let nfa = self.compiled.nfa();
        let mut next: Vec<(StateId, BTreeMap<u32, String>)> = Vec::new();
        for (state, groups) in &self.captures {
            for (atom, target) in nfa.transitions_from(*state) {
                if atom.is_empty() || !atom.matches(c) {
                    continue;
                }
                let mut groups = groups.clone();
                for g in atom.groups() {
                    groups.entry(*g).or_default().push(c);
                }
                for reached in nfa.eps_closure(*target) {
                    if !next.iter().any(|(s, _)| *s == reached) {
                        next.push((reached, groups.clone()));
                    }
                }
            }
        }
        self.captures = next;
    }

    /// The capture map of the accepting path when one has been reached,
    /// otherwise of the first still-live path.
    fn capture_map(&self) -> Option<&BTreeMap<u32, String>> {
        let nfa = self.compiled.nfa();
        self.captures
            .iter()
            .find(|(state, _)| nfa.is_final(*state))
            .or_else(|| self.captures.first())
            .map(|(_, groups)| groups)
    }

    /// Feed every rune of `s`; true iff all were accepted and the matcher
    /// ended on a final state.
    pub fn matches(&mut self, s: &str) -> bool {
        for c in s.chars() {
            if self.match_next(c) == MatchKind::NoMatch {
                return false;
            }
        }
        self.last == MatchKind::FullMatch || (s.is_empty() && self.compiled.matches_empty())
    }

    /// The outcome of the most recent [match_next](Matcher::match_next).
    pub fn last_match(&self) -> MatchKind {
        self.last
    }

    /// The text accepted since the last reset.
    pub fn matched(&self) -> &str {
        &self.matched
    }

    /// The text credited to capture group `index` on the surviving path.
    /// Group 0 is the root and mirrors [matched](Matcher::matched); a group
    /// belonging to an alternative the input has ruled out is absent.
    pub fn group(&self, index: u32) -> Option<&str> {
        self.capture_map()?.get(&index).map(|s| s.as_str())
    }

    /// All capture groups crossed on the surviving path since the last
    /// reset.
    pub fn groups(&self) -> BTreeMap<u32, String> {
        self.capture_map().cloned().unwrap_or_default()
    }

    /// The renderings of the atoms leaving the current state: the runes that
    /// could extend the match. Lex diagnostics list these for every pattern
    /// stuck in a partial match.
    pub fn expecting(&self) -> Vec<String> {
        self.compiled
            .dfa()
            .transitions_from(self.state)
            .iter()
            .map(|(atom, _)| atom.pattern())
            .collect()
    }
}

fn initial_captures(compiled: &CompiledRegex) -> Vec<(StateId, BTreeMap<u32, String>)> {
    let nfa = compiled.nfa();
    nfa.eps_closure(nfa.start())
        .into_iter()
        .map(|state| (state, BTreeMap::new()))
        .collect()
}

impl Debug for Matcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("pattern", &self.compiled.pattern())
            .field("last", &self.last)
            .field("matched", &self.matched)
            .finish()
    }
}
