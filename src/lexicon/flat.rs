//! A flat transition table: states are plain integers and transitions live in
//! one hash map keyed by `(state, symbol)`.
//!
//! The table does no minimization of its own. [`Lexicon::freeze`](super::Lexicon::freeze)
//! fills it from a minimal automaton; it can also be built by hand.

use hashbrown::{HashMap, HashSet};

use super::builder::IntoWord;
use super::state::State;
use super::symbol::Symbol;

/// Identifier of a state in a [`FlatGraph`].
pub type StateId = u32;

/// The state created first; words are walked from here.
pub const ROOT: StateId = 0;

/// A transition table with `u32` state ids.
///
/// At most `u32::MAX` states can be created; see [`create_state`](Self::create_state).
#[derive(Clone, Debug)]
pub struct FlatGraph<C: Symbol> {
    next_id: StateId,
    transitions: HashMap<(StateId, C), StateId>,
    final_states: HashSet<StateId>,
}

impl<C: Symbol> FlatGraph<C> {
    /// Creates a table without any states.
    pub fn new() -> Self {
        FlatGraph {
            next_id: ROOT,
            transitions: HashMap::new(),
            final_states: HashSet::new(),
        }
    }

    /// Allocates a fresh state id.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted. Carrying on would hand out an id
    /// that is already in use and silently merge unrelated states.
    pub fn create_state(&mut self) -> StateId {
        let id = self.next_id;
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => panic!("ran out of states"),
        }
        id
    }

    /// Adds (or retargets) the transition from `src` labeled `symbol`.
    pub fn add_transition(&mut self, src: StateId, symbol: C, dst: StateId) {
        self.transitions.insert((src, symbol), dst);
    }

    /// Follows the transition from `src` labeled `symbol`, if there is one.
    #[inline]
    pub fn walk(&self, src: StateId, symbol: C) -> Option<StateId> {
        self.transitions.get(&(src, symbol)).copied()
    }

    /// Marks a state as the end of a word.
    pub fn set_final(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    /// True if the state is the end of a word.
    #[inline]
    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    /// Returns `true` if `word` leads from [`ROOT`] to a final state.
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        word.collect_word()
            .iter()
            .try_fold(ROOT, |state, &ch| self.walk(state, ch))
            .is_some_and(|state| self.state_count() > 0 && self.is_final(state))
    }

    /// Number of states created so far.
    pub fn state_count(&self) -> usize {
        self.next_id as usize
    }

    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Numbers every state reachable from `root` once, so shared states keep one id.
    pub(crate) fn from_root(root: &State<C>) -> Self {
        let mut graph = FlatGraph::new();
        let mut ids: HashMap<*const State<C>, StateId> = HashMap::new();

        let root_id = graph.create_state();
        if root.is_final() {
            graph.set_final(root_id);
        }
        let mut stack = vec![(root, root_id)];
        while let Some((state, id)) = stack.pop() {
            for (ch, child) in state.children() {
                let key = child as *const State<C>;
                let child_id = match ids.get(&key) {
                    Some(&child_id) => child_id,
                    None => {
                        let child_id = graph.create_state();
                        if child.is_final() {
                            graph.set_final(child_id);
                        }
                        ids.insert(key, child_id);
                        stack.push((child, child_id));
                        child_id
                    }
                };
                graph.add_transition(id, ch, child_id);
            }
        }
        graph
    }
}

impl<C: Symbol> Default for FlatGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexicon::Lexicon;

    #[test]
    fn hand_built_graph() {
        let mut graph = FlatGraph::<char>::new();
        let root = graph.create_state();
        let a = graph.create_state();
        let b = graph.create_state();
        assert_eq!((root, a, b), (ROOT, 1, 2));

        graph.add_transition(root, 'a', a);
        graph.add_transition(a, 'b', b);
        graph.set_final(b);

        assert_eq!(graph.walk(root, 'a'), Some(a));
        assert_eq!(graph.walk(root, 'b'), None);
        assert!(graph.contains("ab"));
        assert!(!graph.contains("a"));
        assert!(!graph.contains("abc"));
        assert_eq!(graph.state_count(), 3);
        assert_eq!(graph.transition_count(), 2);
    }

    #[test]
    fn empty_graph_contains_nothing() {
        let graph = FlatGraph::<char>::default();
        assert!(!graph.contains(""));
        assert!(!graph.contains("a"));
    }

    #[test]
    #[should_panic(expected = "ran out of states")]
    fn exhausting_ids_panics() {
        let mut graph = FlatGraph::<u8>::new();
        graph.next_id = StateId::MAX - 1;
        assert_eq!(graph.create_state(), StateId::MAX - 1);
        graph.create_state();
    }

    #[test]
    fn freeze_preserves_sharing() {
        let words = ["heard", "here", "herd", "head", "hard", "her", "had", "he"];
        let lexicon: Lexicon = words.into_iter().collect();
        let graph = lexicon.freeze();
        assert_eq!(graph.state_count(), lexicon.state_count());
        for word in words {
            assert!(graph.contains(word), "{word}");
        }
        for word in ["h", "hea", "hear", "heads", "x", ""] {
            assert!(!graph.contains(word), "{word}");
        }
    }

    #[test]
    fn freeze_keeps_final_root() {
        let lexicon: Lexicon<u8> = [vec![], vec![7u8]].into_iter().collect();
        let graph = lexicon.freeze();
        assert!(graph.contains(Vec::<u8>::new()));
        assert!(graph.contains([7u8]));
        assert_eq!(graph.state_count(), 2);
    }
}
