//! Thompson construction: every [Regex] node yields a two-port NFA fragment
//! and fragments compose through ε edges. All fragments share one state
//! arena, so states are plain indices and the cyclic ε structure needs no
//! shared ownership.

use super::{Atom, Automaton, Regex, StateId};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

pub(crate) struct NfaBuilder {
    transitions: Vec<Vec<(Atom, StateId)>>,
}

impl NfaBuilder {
    /// Build the NFA recognising `re`.
    pub fn automaton(re: &Regex) -> Automaton {
        let mut builder = NfaBuilder {
            transitions: Vec::new(),
        };
        let fragment = builder.fragment(re);
        Automaton {
            transitions: builder.transitions,
            start: fragment.start,
            finals: vec![fragment.end],
        }
    }

    fn state(&mut self) -> StateId {
        self.transitions.push(Vec::new());
        self.transitions.len() - 1
    }

    fn edge(&mut self, from: StateId, atom: Atom, to: StateId) {
        self.transitions[from].push((atom, to));
    }

    fn eps(&mut self, from: StateId, to: StateId) {
        self.edge(from, Atom::empty(), to);
    }

    fn fragment(&mut self, re: &Regex) -> Fragment {
        match re {
            //  start --c--> end
            Regex::Atom(atom) => {
                let start = self.state();
                let end = self.state();
                if atom.is_empty() {
                    self.eps(start, end);
                } else {
                    self.edge(start, atom.clone(), end);
                }
                Fragment { start, end }
            }
            // modifier groups contribute nothing
            Regex::Flags(_) => {
                let start = self.state();
                let end = self.state();
                self.eps(start, end);
                Fragment { start, end }
            }
            //      left
            //      ∧  \
            //     /    v
            //  start   end
            //     \    ∧
            //      v  /
            //      right
            Regex::Choice(left, right) => {
                let lf = self.fragment(left);
                let rf = self.fragment(right);
                let start = self.state();
                let end = self.state();
                self.eps(start, lf.start);
                self.eps(start, rf.start);
                self.eps(lf.end, end);
                self.eps(rf.end, end);
                Fragment { start, end }
            }
            //  start --> re1 --ε--> re2 --ε--> ... --> end
            Regex::Sequence(factors) => self.chain(factors.iter()),
            //      ______ε______
            //     /             v
            //  start --> ... --> end
            Regex::ZeroOrOne(re) => {
                let f = self.fragment(re);
                self.eps(f.start, f.end);
                f
            }
            Regex::ZeroOrMore(re) => {
                let f = self.fragment(re);
                self.eps(f.start, f.end);
                self.eps(f.end, f.start);
                f
            }
            Regex::OneOrMore(re) => {
                let f = self.fragment(re);
                self.eps(f.end, f.start);
                f
            }
            // min mandatory copies, then max - min optional ones; an
            // unbounded tail (max = 255) collapses to a Kleene copy
            Regex::Repeat { re, min, max } => self.repeat(re, *min, *max),
            // numbering happened during parsing; the atoms inside already
            // carry their group paths
            Regex::Group(re) => self.fragment(re),
        }
    }

    fn chain<'r>(&mut self, factors: impl Iterator<Item = &'r Regex>) -> Fragment {
        let mut combined: Option<Fragment> = None;
        for re in factors {
            let f = self.fragment(re);
            combined = Some(match combined {
                None => f,
                Some(prev) => {
                    self.eps(prev.end, f.start);
                    Fragment {
                        start: prev.start,
                        end: f.end,
                    }
                }
            });
        }
        combined.unwrap_or_else(|| {
            let only = self.state();
            Fragment {
                start: only,
                end: only,
            }
        })
    }

    fn repeat(&mut self, re: &Regex, min: u8, max: u8) -> Fragment {
        let mut combined: Option<Fragment> = None;
        let mut append = |builder: &mut Self, f: Fragment| {
            combined = Some(match combined.take() {
                None => f,
                Some(prev) => {
                    builder.eps(prev.end, f.start);
                    Fragment {
                        start: prev.start,
                        end: f.end,
                    }
                }
            });
        };

        for _ in 0..min {
            let f = self.fragment(re);
            append(self, f);
        }
        if max > min {
            if max == u8::MAX {
                let f = self.fragment(re);
                self.eps(f.start, f.end);
                self.eps(f.end, f.start);
                append(self, f);
            } else {
                for _ in min..max {
                    let f = self.fragment(re);
                    self.eps(f.start, f.end);
                    append(self, f);
                }
            }
        }
        combined.unwrap_or_else(|| {
            let only = self.state();
            Fragment {
                start: only,
                end: only,
            }
        })
    }
}

impl Automaton {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub fn transitions_from(&self, state: StateId) -> &[(Atom, StateId)] {
        &self.transitions[state]
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    /// The states reachable from `state` through ε transitions alone,
    /// `state` itself included.
    pub fn eps_closure(&self, state: StateId) -> Vec<StateId> {
        let mut reachable = Vec::new();
        let mut pending = vec![state];
        while let Some(s) = pending.pop() {
            if reachable.contains(&s) {
                continue;
            }
            reachable.push(s);
            for (atom, target) in self.transitions_from(s) {
                if atom.is_empty() && !reachable.contains(target) {
                    pending.push(*target);
                }
            }
        }
        reachable
    }
}
