use std::sync::Arc;

use hashbrown::HashSet;

use super::state::State;
use super::symbol::Symbol;

/// The set of canonical states of one automaton, keyed by signature.
///
/// Every state reachable from a lexicon root (the root itself excepted) is in the
/// register, and no two registered states have equal signatures. The register
/// holds one strong handle to each entry; a strong count of one therefore means
/// nothing but the register still refers to the state.
pub(crate) struct Register<C: Symbol> {
    states: HashSet<Arc<State<C>>>,
}

impl<C: Symbol> Register<C> {
    pub(crate) fn new() -> Self {
        Register {
            states: HashSet::new(),
        }
    }

    /// Number of registered states.
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns an existing equivalent of `state`, or registers and returns `state` itself.
    ///
    /// All children of `state` must already be registered.
    pub(crate) fn canonicalize(&mut self, state: State<C>) -> Arc<State<C>> {
        debug_assert!(
            state.children().all(|(_, child)| self.contains_instance(child)),
            "Cannot canonicalize unless all children are canonical"
        );
        debug_assert!(!state.is_dead(), "dead states are pruned, not registered");

        if let Some(existing) = self.states.get(&state) {
            Arc::clone(existing)
        } else {
            let state = Arc::new(state);
            self.states.insert(Arc::clone(&state));
            state
        }
    }

    /// Drops a handle to a state that has just been unlinked from its parent.
    ///
    /// If the caller's handle and the register's entry are the last two, the
    /// state has become unreachable: it is unregistered and its children are
    /// released in turn. States still pinned elsewhere (by a live parent or a
    /// snapshot) are left alone; [`sweep`](Self::sweep) collects those later.
    pub(crate) fn release(&mut self, state: Arc<State<C>>) -> usize {
        let mut released = 0;
        let mut stack = vec![state];
        while let Some(state) = stack.pop() {
            if Arc::strong_count(&state) == 2 && self.is_registered(&state) {
                self.states.remove(&*state);
                released += 1;
            }
            if let Ok(state) = Arc::try_unwrap(state) {
                stack.extend(state.into_children());
            }
        }
        released
    }

    /// Unregisters every state that nothing but the register refers to, along
    /// with everything below it that becomes unreferenced in turn. Returns the
    /// number of entries removed.
    pub(crate) fn sweep(&mut self) -> usize {
        let unreferenced: Vec<Arc<State<C>>> = self
            .states
            .iter()
            .filter(|state| Arc::strong_count(state) == 1)
            .cloned()
            .collect();
        unreferenced
            .into_iter()
            .map(|state| self.release(state))
            .sum()
    }

    fn is_registered(&self, state: &Arc<State<C>>) -> bool {
        self.states
            .get(&**state)
            .is_some_and(|entry| Arc::ptr_eq(entry, state))
    }

    fn contains_instance(&self, state: &State<C>) -> bool {
        self.states
            .get(state)
            .is_some_and(|entry| std::ptr::eq(&**entry, state))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chain(register: &mut Register<char>, word: &str) -> Arc<State<char>> {
        let mut child = register.canonicalize(State::new(true));
        for ch in word.chars().rev() {
            let mut state = State::new(false);
            state.add_child(ch, child);
            child = register.canonicalize(state);
        }
        child
    }

    #[test]
    fn equal_states_are_shared() {
        let mut register = Register::new();
        let a = chain(&mut register, "ab");
        let b = chain(&mut register, "ab");
        assert!(Arc::ptr_eq(&a, &b));
        // leaf, "b" state, "ab" state
        assert_eq!(register.len(), 3);
    }

    #[test]
    fn different_states_are_kept_apart() {
        let mut register = Register::new();
        let a = chain(&mut register, "ab");
        let b = chain(&mut register, "ac");
        assert!(!Arc::ptr_eq(&a, &b));
        // shared leaf, "b", "c", "ab", "ac"
        assert_eq!(register.len(), 5);
    }

    #[test]
    fn release_cascades_through_unshared_states() {
        let mut register = Register::new();
        let keep = chain(&mut register, "xb");
        let gone = chain(&mut register, "yab");
        // leaf, "b", "xb", "ab", "yab"
        assert_eq!(register.len(), 5);

        let freed = register.release(gone);
        // "yab" and "ab" are gone; "b" and the leaf are still used by "xb".
        assert_eq!(freed, 2);
        assert_eq!(register.len(), 3);
        assert!(register.contains_instance(&keep));
    }

    #[test]
    fn release_leaves_pinned_states() {
        let mut register = Register::new();
        let state = chain(&mut register, "ab");
        let pinned = Arc::clone(&state);
        assert_eq!(register.release(state), 0);
        assert_eq!(register.len(), 3);

        drop(pinned);
        assert_eq!(register.sweep(), 3);
        assert_eq!(register.len(), 0);
    }

    #[test]
    fn sweep_frees_a_long_chain_in_one_pass() {
        let mut register = Register::new();
        let word: String = "ab".repeat(50_000);
        let top = chain(&mut register, &word);
        let keep = chain(&mut register, "xb");
        assert_eq!(register.len(), 100_001 + 1);

        drop(top);
        assert_eq!(register.sweep(), 100_001 - 2);
        // "xb", "b" and the shared leaf remain.
        assert_eq!(register.len(), 3);
        assert!(register.contains_instance(&keep));
    }
}
