use crate::GrammarError;
use std::collections::HashSet;

/// Guards FIRST/FOLLOW traversals against re-entering an element already
/// being visited. Elements are keyed by address: the grammar graph is
/// frozen while traversals run, so identity is stable.
pub(crate) struct CycleDetector {
    seen: HashSet<usize>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    pub fn enter(
        &mut self,
        key: usize,
        describe: impl FnOnce() -> String,
    ) -> Result<(), GrammarError> {
        if !self.seen.insert(key) {
            return Err(GrammarError::new(format!(
                "cycle detected containing {}",
                describe()
            )));
        }
        Ok(())
    }

    pub fn leave(&mut self, key: usize) {
        self.seen.remove(&key);
    }
}
