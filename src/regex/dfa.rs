//! Subset construction with ε-closure. A DFA state stands for a set of NFA
//! states; outgoing atoms that render to the same pattern text are fused
//! into one edge whose capture-group path is the union of the originals.
//!
//! `(aab)|(aac)` produces two `a` atoms on the first step, one inside
//! group 1 and one inside group 2; the subset construction must present a
//! single deterministic edge, so the fused atom keeps the predicate of
//! either representative (they are equivalent by construction) and the
//! unioned path records which groups the edge may belong to. A fused edge
//! never decides capture credit by itself: the matcher threads captured
//! text along the live NFA states, so a group whose alternative has died
//! is not credited (see the matcher module).

use super::{Atom, Automaton, StateId};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub(crate) fn determinise(nfa: &Automaton) -> Automaton {
    let mut transitions: Vec<Vec<(Atom, StateId)>> = Vec::new();
    let mut finals: Vec<StateId> = Vec::new();
    let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut worklist: VecDeque<(StateId, BTreeSet<StateId>)> = VecDeque::new();

    let mut install = |subset: BTreeSet<StateId>,
                       transitions: &mut Vec<Vec<(Atom, StateId)>>,
                       finals: &mut Vec<StateId>,
                       worklist: &mut VecDeque<(StateId, BTreeSet<StateId>)>|
     -> StateId {
        let key: Vec<StateId> = subset.iter().copied().collect();
        if let Some(id) = ids.get(&key) {
            return *id;
        }
        let id = transitions.len();
        transitions.push(Vec::new());
        ids.insert(key, id);
        if subset.iter().any(|s| nfa.is_final(*s)) {
            finals.push(id);
        }
        worklist.push_back((id, subset));
        id
    };

    let start_set = closure(nfa, std::iter::once(nfa.start()));
    let start = install(start_set, &mut transitions, &mut finals, &mut worklist);

    while let Some((source, subset)) = worklist.pop_front() {
        // group the outgoing non-ε atoms of every member state by pattern
        // text, unioning capture-group paths and target states per group
        let mut fused: BTreeMap<String, (Atom, BTreeSet<StateId>)> = BTreeMap::new();
        for &s in &subset {
            for (atom, target) in nfa.transitions_from(s) {
                if atom.is_empty() {
                    continue;
                }
                match fused.entry(atom.pattern()) {
                    std::collections::btree_map::Entry::Occupied(mut entry) => {
                        let (representative, targets) = entry.get_mut();
                        representative.merge_groups(atom);
                        targets.insert(*target);
                    }
                    std::collections::btree_map::Entry::Vacant(entry) => {
                        entry.insert((atom.clone(), BTreeSet::from([*target])));
                    }
                }
            }
        }

        for (_, (atom, targets)) in fused {
            let target_set = closure(nfa, targets.into_iter());
            let target = install(target_set, &mut transitions, &mut finals, &mut worklist);
            transitions[source].push((atom, target));
        }
    }

    Automaton {
        transitions,
        start,
        finals,
    }
}

/// The set of states reachable from `seeds` through ε transitions alone.
fn closure(nfa: &Automaton, seeds: impl Iterator<Item = StateId>) -> BTreeSet<StateId> {
    seeds.flat_map(|s| nfa.eps_closure(s)).collect()
}
