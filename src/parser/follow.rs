//! FOLLOW sets: for a production P, the union over every other production
//! Q of the FIRST sets of whatever can textually succeed a reference to P
//! inside Q's body, plus FOLLOW(Q) itself whenever the tail after such a
//! reference is entirely nullable.

use super::{CycleDetector, Grammar, Production, Sentence};
use crate::GrammarError;
use std::collections::HashSet;

/// What a sentence contributes to FOLLOW of a production referenced inside
/// it: the follow tokens found, whether some reference is followed only by
/// nullable material up to the end of the sentence, and whether the
/// sentence contains a reference at all.
type FollowPart = (HashSet<String>, bool, bool);

impl Sentence {
    fn follow_of(
        &self,
        g: &Grammar,
        production: &str,
        cd: &mut CycleDetector,
    ) -> Result<FollowPart, GrammarError> {
        match self {
            Sentence::Token { .. } => Ok((HashSet::new(), false, false)),
            Sentence::Rule { name, .. } => {
                if name == production {
                    Ok((HashSet::new(), true, true))
                } else {
                    // references to other productions are covered by the
                    // per-production iteration in Production::follow
                    Ok((HashSet::new(), false, false))
                }
            }
            Sentence::Sequence { elements, .. } => {
                let mut follow = HashSet::new();
                let mut empty_till_end = false;
                let mut found = false;
                for (index, element) in elements.iter().enumerate() {
                    let (f, ends_nullable, fnd) = element.follow_of(g, production, cd)?;
                    if !fnd {
                        continue;
                    }
                    found = true;
                    follow.extend(f);
                    if ends_nullable {
                        // the reference can end `element`; whatever can
                        // start the tail follows it
                        let mut tail_nullable = true;
                        for later in &elements[index + 1..] {
                            follow.extend(later.first(g, cd)?);
                            if !later.match_empty(g) {
                                tail_nullable = false;
                                break;
                            }
                        }
                        if tail_nullable {
                            empty_till_end = true;
                        }
                    }
                }
                Ok((follow, empty_till_end, found))
            }
            Sentence::Choice { alternates, .. } => {
                let mut follow = HashSet::new();
                let mut empty_till_end = false;
                let mut found = false;
                for a in alternates {
                    let (f, ends_nullable, fnd) = a.follow_of(g, production, cd)?;
                    follow.extend(f);
                    empty_till_end = empty_till_end || ends_nullable;
                    found = found || fnd;
                }
                Ok((follow, empty_till_end, found))
            }
            Sentence::Optional { sentence, .. } => sentence.follow_of(g, production, cd),
            Sentence::ZeroOrMore { sentence, .. }
            | Sentence::OneOrMore { sentence, .. }
            | Sentence::Repeat { sentence, .. } => {
                let (mut follow, ends_nullable, found) = sentence.follow_of(g, production, cd)?;
                if found {
                    // another iteration may start right after the reference
                    follow.extend(sentence.first(g, cd)?);
                }
                Ok((follow, ends_nullable, found))
            }
        }
    }
}

impl Production {
    /// The FOLLOW set of this production across every call site in the
    /// grammar. Memoised after the first computation; mutually tail-calling
    /// productions are cut by returning the partial set under computation.
    pub(crate) fn follow(
        &self,
        g: &Grammar,
        cd: &mut CycleDetector,
    ) -> Result<HashSet<String>, GrammarError> {
        if let Some(follow) = self.follow.get() {
            return Ok(follow.clone());
        }
        if self.follow_guard.get() {
            return Ok(HashSet::new());
        }
        self.follow_guard.set(true);
        let result = self.compute_follow(g, cd);
        self.follow_guard.set(false);

        let follow = result?;
        let _ = self.follow.set(follow.clone());
        Ok(follow)
    }

    fn compute_follow(
        &self,
        g: &Grammar,
        cd: &mut CycleDetector,
    ) -> Result<HashSet<String>, GrammarError> {
        let mut follow = HashSet::new();
        for production in g.productions() {
            if production.name == self.name {
                continue;
            }
            let (f, empty_till_end, found) =
                production.sentence.follow_of(g, &self.name, cd)?;
            if !found {
                continue;
            }
            follow.extend(f);
            if empty_till_end {
                follow.extend(production.follow(g, cd)?);
            }
        }
        Ok(follow)
    }
}
