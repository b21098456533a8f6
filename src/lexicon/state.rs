use std::fmt;
use std::hash;
use std::sync::Arc;

use smallvec::SmallVec;

use super::symbol::Symbol;

/// Outgoing transitions of a state, sorted by symbol.
///
/// Most states in a word graph have one or two children, so those stay inline.
pub(crate) type Transitions<C> = SmallVec<[(C, Arc<State<C>>); 2]>;

/// A state in the lexicon automaton.
///
/// A state reachable from a [`Lexicon`](super::Lexicon) root is registered and
/// shared by every parent that points to it; it is never modified after that.
/// Mutations build new states from old ones (see [`with_added_child`](Self::with_added_child)
/// and friends) and hand them to the register.
#[derive(Clone)]
pub struct State<C: Symbol> {
    transitions: Transitions<C>,
    is_final: bool,
}

impl<C: Symbol> State<C> {
    /// Creates a state without transitions.
    ///
    /// # Arguments
    ///
    /// * `is_final` - Whether the path leading to this state spells a word
    pub fn new(is_final: bool) -> Self {
        State {
            transitions: SmallVec::new(),
            is_final,
        }
    }

    /// Returns the state that `symbol`'s transition leads to, or None if there is no such transition.
    #[inline]
    pub fn get(&self, symbol: C) -> Option<&State<C>> {
        self.get_shared(symbol).map(|child| &**child)
    }

    #[inline]
    pub(crate) fn get_shared(&self, symbol: C) -> Option<&Arc<State<C>>> {
        self.position(symbol)
            .ok()
            .map(|index| &self.transitions[index].1)
    }

    #[inline]
    fn position(&self, symbol: C) -> Result<usize, usize> {
        self.transitions.binary_search_by_key(&symbol, |&(label, _)| label)
    }

    /// True if the path leading to this state spells a complete word.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns an iterator over the transitions of this state, in ascending symbol order.
    #[inline]
    pub fn children(
        &self,
    ) -> impl DoubleEndedIterator<Item = (C, &State<C>)> + ExactSizeIterator + '_ {
        self.transitions
            .iter()
            .map(|(symbol, child)| (*symbol, &**child))
    }

    /// Returns the number of outgoing transitions.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.transitions.len()
    }

    /// A non-final state without transitions accepts nothing and must be pruned.
    #[inline]
    pub(crate) fn is_dead(&self) -> bool {
        !self.is_final && self.transitions.is_empty()
    }

    pub(crate) fn set_final(&mut self, is_final: bool) {
        self.is_final = is_final;
    }

    /// Adds a transition at its sorted position. The symbol must not already have one.
    pub(crate) fn add_child(&mut self, symbol: C, child: Arc<State<C>>) {
        match self.position(symbol) {
            Ok(_) => debug_assert!(false, "add_child: symbol already exists"),
            Err(index) => self.transitions.insert(index, (symbol, child)),
        }
    }

    /// Retargets `symbol`'s transition to `child` and returns the previous target.
    ///
    /// Panics if `symbol` is not present.
    pub(crate) fn replace_child(&mut self, symbol: C, child: Arc<State<C>>) -> Arc<State<C>> {
        match self.position(symbol) {
            Ok(index) => std::mem::replace(&mut self.transitions[index].1, child),
            Err(_) => panic!("replace_child: symbol not found"),
        }
    }

    /// Removes `symbol`'s transition and returns its target.
    ///
    /// Panics if `symbol` is not present.
    pub(crate) fn remove_child(&mut self, symbol: C) -> Arc<State<C>> {
        match self.position(symbol) {
            Ok(index) => self.transitions.remove(index).1,
            Err(_) => panic!("remove_child: symbol not found"),
        }
    }

    /// Returns an open copy of this state with the given final flag.
    pub(crate) fn with_final(&self, is_final: bool) -> State<C> {
        State {
            transitions: self.transitions.clone(),
            is_final,
        }
    }

    /// Returns an open copy of this state with an additional transition.
    pub(crate) fn with_added_child(&self, symbol: C, child: Arc<State<C>>) -> State<C> {
        let mut state = self.clone();
        state.add_child(symbol, child);
        state
    }

    /// Returns an open copy of this state with `symbol`'s transition retargeted to `child`.
    pub(crate) fn with_replaced_child(&self, symbol: C, child: Arc<State<C>>) -> State<C> {
        let mut state = self.clone();
        state.replace_child(symbol, child);
        state
    }

    /// Returns an open copy of this state without `symbol`'s transition.
    pub(crate) fn without_child(&self, symbol: C) -> State<C> {
        let mut state = self.clone();
        state.remove_child(symbol);
        state
    }

    pub(crate) fn into_children(mut self) -> impl Iterator<Item = Arc<State<C>>> {
        std::mem::take(&mut self.transitions)
            .into_iter()
            .map(|(_, child)| child)
    }
}

// A chain of uniquely owned states would otherwise be freed one nested drop
// per symbol. Children that this state held the last handle to are unlinked
// onto a local stack first, so each drop below runs with no transitions.
impl<C: Symbol> Drop for State<C> {
    fn drop(&mut self) {
        if self.transitions.is_empty() {
            return;
        }
        let mut stack: Vec<Arc<State<C>>> = self
            .transitions
            .drain(..)
            .map(|(_, child)| child)
            .collect();
        while let Some(child) = stack.pop() {
            if let Ok(mut state) = Arc::try_unwrap(child) {
                stack.extend(state.transitions.drain(..).map(|(_, child)| child));
            }
        }
    }
}

// Children are always registered before their parent, so two states accept the
// same language exactly when their flags match and their transitions point to
// the same child instances. Comparing addresses keeps this one level deep.
impl<C: Symbol> PartialEq for State<C> {
    fn eq(&self, rhs: &Self) -> bool {
        self.is_final == rhs.is_final
            && self.transitions.len() == rhs.transitions.len()
            && self
                .transitions
                .iter()
                .zip(&rhs.transitions)
                .all(|((c1, n1), (c2, n2))| c1 == c2 && Arc::ptr_eq(n1, n2))
    }
}

impl<C: Symbol> Eq for State<C> {}

impl<C: Symbol> hash::Hash for State<C> {
    fn hash<H>(&self, state: &mut H)
    where
        H: hash::Hasher,
    {
        self.is_final.hash(state);
        for (symbol, child) in &self.transitions {
            (symbol, Arc::as_ptr(child)).hash(state);
        }
    }
}

/// Shows the flag and outgoing symbols only; states can be nested arbitrarily deep.
impl<C: Symbol> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: SmallVec<[C; 8]> = self.transitions.iter().map(|&(c, _)| c).collect();
        f.debug_struct("State")
            .field("is_final", &self.is_final)
            .field("children", &symbols)
            .finish()
    }
}
