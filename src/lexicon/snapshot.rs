use std::fmt;
use std::sync::Arc;

use super::builder::IntoWord;
use super::order::SymbolOrder;
use super::query::render;
use super::state::State;
use super::symbol::Symbol;

/// A read-only view of a [`Lexicon`](super::Lexicon) as it was when the snapshot was taken.
///
/// States are never modified once they are shared, so a snapshot is just a handle
/// to an old root. It stays valid and unchanged however the lexicon is mutated
/// afterwards, and it can be sent to and queried from other threads.
///
/// # Examples
///
/// ```
/// use lexicos::Lexicon;
///
/// let mut lexicon: Lexicon = ["BAKE", "CAKE"].into_iter().collect();
/// let snapshot = lexicon.snapshot();
/// lexicon.delete("BAKE");
///
/// assert!(snapshot.contains("BAKE"));
/// assert!(!lexicon.contains("BAKE"));
/// ```
#[derive(Clone)]
pub struct Snapshot<C: Symbol = char> {
    root: Arc<State<C>>,
    order: Arc<SymbolOrder<C>>,
    len: usize,
}

impl<C: Symbol> Snapshot<C> {
    pub(crate) fn new(root: Arc<State<C>>, order: Arc<SymbolOrder<C>>, len: usize) -> Self {
        Snapshot { root, order, len }
    }

    /// Returns a reference to the root state.
    pub fn root(&self) -> &State<C> {
        &self.root
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the snapshot holds no words.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the given word is in the snapshot.
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        self.root.has_suffix(&word.collect_word())
    }

    /// Returns every word that starts with `prefix`, in ascending order.
    pub fn lookup<W: FromIterator<C>>(&self, prefix: impl IntoWord<C>) -> Vec<W> {
        self.root.complete(&prefix.collect_word())
    }

    /// Returns every word that is a prefix of `phrase[offset..]`, shortest first.
    pub fn words<W: FromIterator<C>>(&self, phrase: impl IntoWord<C>, offset: usize) -> Vec<W> {
        self.root.prefixes_of(&phrase.collect_word(), offset)
    }
}

/// Renders the snapshot the same way as [`Lexicon`](super::Lexicon) does.
impl<C: Symbol> fmt::Display for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.root, &self.order, f)
    }
}

impl<C: Symbol> fmt::Debug for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("len", &self.len).finish()
    }
}
