//! FIRST sets and nullability.
//!
//! FIRST is computed recursively with per-node memoisation and cycle
//! detection; sets contain token type ids only, never an empty marker.
//! Nullability is the separate `match_empty` predicate: a token reference
//! is nullable iff its compiled pattern accepts the empty string, and the
//! combinators derive theirs from that.

use super::{CycleDetector, Grammar, Production, Sentence};
use crate::GrammarError;
use std::collections::HashSet;
use std::rc::Rc;

impl Sentence {
    pub(crate) fn first(
        &self,
        g: &Grammar,
        cd: &mut CycleDetector,
    ) -> Result<HashSet<String>, GrammarError> {
        let key = self as *const Sentence as usize;
        match self {
            Sentence::Token { id, .. } => Ok(HashSet::from([id.clone()])),
            Sentence::Rule { name, .. } => {
                cd.enter(key, || name.clone())?;
                let production = g.find(name).ok_or_else(|| {
                    GrammarError::new(format!("could not find production {:?}", name))
                })?;
                let first = production.sentence.first(g, cd)?;
                cd.leave(key);
                Ok(first)
            }
            Sentence::Sequence {
                elements, first, ..
            } => first
                .get_or_try_init(|| {
                    cd.enter(key, || self.to_string())?;
                    let mut set = HashSet::new();
                    for e in elements {
                        set.extend(e.first(g, cd)?);
                        if !e.match_empty(g) {
                            break;
                        }
                    }
                    cd.leave(key);
                    Ok(set)
                })
                .map(Clone::clone),
            Sentence::Choice {
                alternates, first, ..
            } => first
                .get_or_try_init(|| {
                    cd.enter(key, || self.to_string())?;
                    let mut set = HashSet::new();
                    for a in alternates {
                        set.extend(a.first(g, cd)?);
                    }
                    cd.leave(key);
                    Ok(set)
                })
                .map(Clone::clone),
            Sentence::Optional { sentence, .. }
            | Sentence::ZeroOrMore { sentence, .. }
            | Sentence::OneOrMore { sentence, .. } => sentence.first(g, cd),
            Sentence::Repeat {
                sentence, first, ..
            } => first.get_or_try_init(|| sentence.first(g, cd)).map(Clone::clone),
        }
    }

    /// Whether the sentence can derive the empty string.
    pub fn match_empty(&self, g: &Grammar) -> bool {
        self.match_empty_guarded(g, &mut HashSet::new())
    }

    fn match_empty_guarded(&self, g: &Grammar, visiting: &mut HashSet<usize>) -> bool {
        match self {
            Sentence::Token { id, .. } => g
                .lexer()
                .token_type(id)
                .map_or(false, |t| t.compiled().matches_empty()),
            Sentence::Rule { name, .. } => match g.find(name) {
                Some(production) => {
                    let key = Rc::as_ptr(production) as usize;
                    if !visiting.insert(key) {
                        // a derivation that needs itself never terminates
                        return false;
                    }
                    let nullable = production.sentence.match_empty_guarded(g, visiting);
                    visiting.remove(&key);
                    nullable
                }
                None => false,
            },
            Sentence::Sequence { elements, .. } => elements
                .iter()
                .all(|e| e.match_empty_guarded(g, visiting)),
            Sentence::Choice { alternates, .. } => alternates
                .iter()
                .any(|a| a.match_empty_guarded(g, visiting)),
            Sentence::Optional { .. } | Sentence::ZeroOrMore { .. } => true,
            Sentence::OneOrMore { sentence, .. } => sentence.match_empty_guarded(g, visiting),
            Sentence::Repeat { sentence, min, .. } => {
                *min == 0 || sentence.match_empty_guarded(g, visiting)
            }
        }
    }
}

impl Production {
    pub(crate) fn first(
        &self,
        g: &Grammar,
        cd: &mut CycleDetector,
    ) -> Result<HashSet<String>, GrammarError> {
        let key = self as *const Production as usize;
        cd.enter(key, || self.name.clone())?;
        let first = self.sentence.first(g, cd)?;
        cd.leave(key);
        Ok(first)
    }

    /// Whether the production can derive the empty string.
    pub fn match_empty(&self, g: &Grammar) -> bool {
        self.sentence.match_empty(g)
    }
}
