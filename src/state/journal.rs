use ethers::types::U256;
use std::collections::HashMap;
use std::hash::Hash;

/// Position in a journal returned by [`Journaled::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// State that can be rolled back to an earlier checkpoint.
///
/// Checkpoints nest: reverting an inner checkpoint leaves writes made before
/// it intact, and committing an inner checkpoint keeps its writes revertible
/// by any enclosing one.
pub trait Journaled {
    fn checkpoint(&mut self) -> Checkpoint;
    fn commit(&mut self, checkpoint: Checkpoint);
    fn revert(&mut self, checkpoint: Checkpoint);
}

/// Run `f` as one all-or-nothing unit against `state`.
///
/// Every write `f` makes is kept if it returns `Ok` and undone if it returns
/// `Err`, whatever stage of the pipeline failed.
pub fn atomically<S, T, E, F>(state: &mut S, f: F) -> Result<T, E>
where
    S: Journaled + ?Sized,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    let checkpoint = state.checkpoint();
    match f(state) {
        Ok(value) => {
            state.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            state.revert(checkpoint);
            Err(err)
        }
    }
}

/// Balance map with an undo log.
///
/// Absent keys read as zero and zero values are not stored. Writes made while
/// no checkpoint is open (genesis, minting) are not journaled.
#[derive(Debug, Clone)]
pub struct JournaledMap<K> {
    entries: HashMap<K, U256>,
    undo: Vec<(K, Option<U256>)>,
    depth: usize,
}

impl<K: Eq + Hash + Clone> JournaledMap<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            undo: Vec::new(),
            depth: 0,
        }
    }

    pub fn get(&self, key: &K) -> U256 {
        self.entries.get(key).copied().unwrap_or_default()
    }

    pub fn set(&mut self, key: K, value: U256) {
        let previous = if value.is_zero() {
            self.entries.remove(&key)
        } else {
            self.entries.insert(key.clone(), value)
        };
        if self.depth > 0 {
            self.undo.push((key, previous));
        }
    }
}

impl<K: Eq + Hash + Clone> Default for JournaledMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> Journaled for JournaledMap<K> {
    fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint(self.undo.len())
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        debug_assert!(self.depth > 0 && checkpoint.0 <= self.undo.len());
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.undo.clear();
        }
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        debug_assert!(self.depth > 0 && checkpoint.0 <= self.undo.len());
        while self.undo.len() > checkpoint.0 {
            let Some((key, previous)) = self.undo.pop() else {
                break;
            };
            match previous {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.undo.clear();
        }
    }
}
