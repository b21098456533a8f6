use hashbrown::HashMap;

use super::symbol::Symbol;

/// The order in which symbols were first added to a lexicon.
///
/// Rendering lists the transitions of every state by this rank instead of by
/// storage order. Ranks are only ever appended, so an insert followed by the
/// matching delete leaves the relative order of the remaining symbols, and
/// therefore the rendering, unchanged.
#[derive(Clone, Debug)]
pub(crate) struct SymbolOrder<C: Symbol> {
    ranks: HashMap<C, usize>,
}

impl<C: Symbol> SymbolOrder<C> {
    pub(crate) fn new() -> Self {
        SymbolOrder {
            ranks: HashMap::new(),
        }
    }

    /// True if every symbol of `word` already has a rank.
    pub(crate) fn covers(&self, word: &[C]) -> bool {
        word.iter().all(|ch| self.ranks.contains_key(ch))
    }

    /// Ranks the symbols of `word` that have not been seen yet, left to right.
    pub(crate) fn observe(&mut self, word: &[C]) {
        for &ch in word {
            let next = self.ranks.len();
            self.ranks.entry(ch).or_insert(next);
        }
    }

    /// Sort key for a transition label. Unranked symbols sort last, by value.
    pub(crate) fn key(&self, ch: C) -> (usize, C) {
        (self.ranks.get(&ch).copied().unwrap_or(usize::MAX), ch)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ranks_follow_first_appearance() {
        let mut order = SymbolOrder::new();
        order.observe(&['h', 'e', 'a', 'r', 'd']);
        order.observe(&['h', 'e', 'r', 'e']);
        order.observe(&['x']);
        assert!(order.key('h') < order.key('e'));
        assert!(order.key('e') < order.key('a'));
        assert!(order.key('d') < order.key('x'));
        assert!(order.covers(&['d', 'a', 'd']));
        assert!(!order.covers(&['d', 'z']));
        // Unknown symbols come after every ranked one.
        assert!(order.key('x') < order.key('b'));
        assert!(order.key('b') < order.key('c'));
    }
}
