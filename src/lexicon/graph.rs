use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::builder::{build_lexicon, build_lexicon_from_file, BuilderError, IntoWord, LoadError};
use super::flat::FlatGraph;
use super::order::SymbolOrder;
use super::query::render;
use super::register::Register;
use super::snapshot::Snapshot;
use super::state::State;
use super::symbol::Symbol;

/// Path of shared states visited by a mutation; `path[i]` is reached by `word[..=i]`.
type StatePath<C> = SmallVec<[Arc<State<C>>; 32]>;

/// A set of words stored as a minimal acyclic automaton.
///
/// Words can be inserted and deleted in any order; after every operation no two
/// states of the automaton accept the same set of suffixes. Mutation never
/// modifies a state that is shared: the path from the root to the change is
/// rebuilt from new states, each of which is either replaced by an equivalent
/// registered state or registered itself, and the new root is then put in place.
///
/// # Examples
///
/// ```
/// use lexicos::Lexicon;
///
/// let mut lexicon = Lexicon::new();
/// for word in ["heard", "here", "herd", "head", "hard", "her", "had", "he"] {
///     assert!(lexicon.insert(word));
/// }
/// assert!(!lexicon.insert("heard"));
/// assert_eq!(lexicon.to_string(), "h(e$(a(rd$|d$)|r$(e$|d$))|a(rd$|d$))");
///
/// assert!(lexicon.delete("herd"));
/// assert!(!lexicon.contains("herd"));
///
/// let words: Vec<String> = lexicon.lookup("he");
/// assert_eq!(words, ["he", "head", "heard", "her", "here"]);
/// ```
pub struct Lexicon<C: Symbol = char> {
    root: Arc<State<C>>,
    register: Register<C>,
    order: Arc<SymbolOrder<C>>,
    len: usize,
}

impl<C: Symbol> Lexicon<C> {
    /// Creates an empty lexicon.
    pub fn new() -> Self {
        Self::from_parts(State::new(false), Register::new(), SymbolOrder::new(), 0)
    }

    pub(crate) fn from_parts(
        root: State<C>,
        register: Register<C>,
        order: SymbolOrder<C>,
        len: usize,
    ) -> Self {
        Lexicon {
            root: Arc::new(root),
            register,
            order: Arc::new(order),
            len,
        }
    }

    /// Builds a lexicon from words in strictly ascending order, in a single pass.
    ///
    /// This is faster than inserting the words one at a time; see [`build_lexicon`].
    pub fn from_sorted<W: IntoWord<C>>(
        words: impl IntoIterator<Item = W>,
    ) -> Result<Self, BuilderError<C>> {
        build_lexicon(words)
    }

    /// Returns a reference to the root state.
    ///
    /// Use [`get()`](State::get), [`is_final()`](State::is_final),
    /// [`children()`](State::children), etc. to traverse the automaton.
    pub fn root(&self) -> &State<C> {
        &self.root
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the lexicon holds no words.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of states, the root included.
    ///
    /// States pinned only by dropped snapshots are counted until [`compact`](Self::compact) runs.
    pub fn state_count(&self) -> usize {
        self.register.len() + 1
    }

    /// Walks the existing path of `word` as far as it goes, collecting the shared states on it.
    fn common_prefix(&self, word: &[C]) -> (StatePath<C>, bool) {
        let mut path = StatePath::new();
        let mut current: &State<C> = &self.root;
        for &ch in word {
            match current.get_shared(ch) {
                Some(child) => {
                    path.push(Arc::clone(child));
                    current = child;
                }
                None => break,
            }
        }
        (path, current.is_final())
    }

    /// Adds a word.
    ///
    /// Returns `true` if the word was added, `false` if it was already present;
    /// in the latter case nothing is allocated or changed. Inserting the empty
    /// word marks the root final.
    pub fn insert(&mut self, word: impl IntoWord<C>) -> bool {
        let word = word.collect_word();

        // Phase 1: Walk the common prefix.
        let (path, reached_final) = self.common_prefix(&word);
        let prefix_len = path.len();
        if prefix_len == word.len() && reached_final {
            return false;
        }
        if !self.order.covers(&word) {
            Arc::make_mut(&mut self.order).observe(&word);
        }
        if word.is_empty() {
            Arc::make_mut(&mut self.root).set_final(true);
            self.len += 1;
            return true;
        }

        // Phase 2: Build the bottom of the new path.
        let diverged = prefix_len < word.len();
        let mut updated = if diverged {
            // Fresh states for word[prefix_len + 1..], registered from the leaf up.
            let mut child = self.register.canonicalize(State::new(true));
            for &ch in word[prefix_len + 1..].iter().rev() {
                let mut state = State::new(false);
                state.add_child(ch, child);
                child = self.register.canonicalize(state);
            }
            child
        } else {
            // The path exists but doesn't end in a final state.
            let terminal = path[prefix_len - 1].with_final(true);
            self.register.canonicalize(terminal)
        };

        // Phase 3: Walk the path bottom-up, copying each ancestor with the updated child.
        // At the divergence point the child is a new transition; above it, a replaced one.
        let start_level = if diverged { prefix_len } else { prefix_len - 1 };
        for level in (1..=start_level).rev() {
            let parent = &path[level - 1];
            let ch = word[level];
            let state = if diverged && level == prefix_len {
                parent.with_added_child(ch, updated)
            } else {
                parent.with_replaced_child(ch, updated)
            };
            updated = self.register.canonicalize(state);
        }
        drop(path);

        // Phase 4: Commit to the root.
        let root = Arc::make_mut(&mut self.root);
        if diverged && prefix_len == 0 {
            root.add_child(word[0], updated);
        } else {
            let old = root.replace_child(word[0], updated);
            self.register.release(old);
        }
        self.len += 1;

        trace!(len = word.len(), prefix_len, "inserted word");
        true
    }

    /// Removes a word.
    ///
    /// Returns `true` if the word was removed, `false` if it was not present.
    /// States left without a word below them are pruned, and states that become
    /// unreachable are dropped from the register.
    pub fn delete(&mut self, word: impl IntoWord<C>) -> bool {
        let word = word.collect_word();

        // Phase 1: Walk the full path.
        let (path, reached_final) = self.common_prefix(&word);
        if path.len() < word.len() || !reached_final {
            return false;
        }
        if word.is_empty() {
            Arc::make_mut(&mut self.root).set_final(false);
            self.len -= 1;
            return true;
        }

        // Phase 2: Copy the terminal without the final flag; prune it if nothing is left.
        let terminal = path[word.len() - 1].with_final(false);
        let mut updated = (!terminal.is_dead()).then(|| self.register.canonicalize(terminal));

        // Phase 3: Walk the path bottom-up, pruning dead states and copying the rest.
        for level in (1..word.len()).rev() {
            let parent = &path[level - 1];
            let ch = word[level];
            let state = match updated {
                Some(child) => parent.with_replaced_child(ch, child),
                None => parent.without_child(ch),
            };
            updated = (!state.is_dead()).then(|| self.register.canonicalize(state));
        }
        drop(path);

        // Phase 4: Commit to the root.
        let root = Arc::make_mut(&mut self.root);
        let old = match updated {
            Some(child) => root.replace_child(word[0], child),
            None => root.remove_child(word[0]),
        };
        self.register.release(old);
        self.len -= 1;

        trace!(len = word.len(), "deleted word");
        true
    }

    /// Returns `true` if the given word is in the lexicon.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicos::Lexicon;
    ///
    /// let lexicon: Lexicon = ["BAKE", "CAKE"].into_iter().collect();
    /// assert!(lexicon.contains("CAKE"));
    /// assert!(!lexicon.contains("FAKE"));
    /// assert!(!lexicon.contains("CAK"));
    /// ```
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        self.root.has_suffix(&word.collect_word())
    }

    /// Returns every word that starts with `prefix`, in ascending order.
    ///
    /// The prefix itself is included if it is a word; an empty prefix lists the whole lexicon.
    pub fn lookup<W: FromIterator<C>>(&self, prefix: impl IntoWord<C>) -> Vec<W> {
        self.root.complete(&prefix.collect_word())
    }

    /// Returns every word that matches `phrase` at `offset` (counted in symbols), shortest first.
    ///
    /// A word matches if it is a prefix of `phrase[offset..]`. An out-of-range
    /// offset yields no words.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicos::Lexicon;
    ///
    /// let lexicon: Lexicon = ["he", "head", "ad"].into_iter().collect();
    /// let words: Vec<String> = lexicon.words("head", 0);
    /// assert_eq!(words, ["he", "head"]);
    /// let words: Vec<String> = lexicon.words("head", 2);
    /// assert_eq!(words, ["ad"]);
    /// ```
    pub fn words<W: FromIterator<C>>(&self, phrase: impl IntoWord<C>, offset: usize) -> Vec<W> {
        self.root.prefixes_of(&phrase.collect_word(), offset)
    }

    /// Captures the current contents.
    ///
    /// The snapshot is unaffected by later insertions and deletions and can be
    /// queried from other threads while this lexicon keeps changing.
    pub fn snapshot(&self) -> Snapshot<C> {
        Snapshot::new(Arc::clone(&self.root), Arc::clone(&self.order), self.len)
    }

    /// Drops register entries for states that are no longer reachable.
    ///
    /// Unreachable states are normally released as soon as a mutation unlinks
    /// them; states that a snapshot still held at that time linger until this runs.
    /// Returns the number of states reclaimed.
    pub fn compact(&mut self) -> usize {
        let reclaimed = self.register.sweep();
        debug!(reclaimed, states = self.state_count(), "compacted lexicon");
        reclaimed
    }

    /// Copies the automaton into a flat transition table, one id per state.
    ///
    /// Shared states keep a single id, so the table is exactly as minimal as the lexicon.
    pub fn freeze(&self) -> FlatGraph<C> {
        FlatGraph::from_root(&self.root)
    }
}

impl Lexicon<char> {
    /// Loads a sorted word list, one word per line. See [`build_lexicon_from_file`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        build_lexicon_from_file(path)
    }
}

impl<C: Symbol> Default for Lexicon<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the automaton as a regular-expression-like string.
///
/// Each transition renders as its symbol, a `$` if the target is final, and the
/// rendering of the target. A single transition renders bare; several are joined
/// with `|` and wrapped in parentheses. Transitions are listed in the order
/// their symbols were first added to the lexicon, so the rendering depends only
/// on the word set and that order.
impl<C: Symbol> fmt::Display for Lexicon<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.root, &self.order, f)
    }
}

impl<C: Symbol> fmt::Debug for Lexicon<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("len", &self.len)
            .field("state_count", &self.state_count())
            .finish()
    }
}

impl<C: Symbol, W: IntoWord<C>> FromIterator<W> for Lexicon<C> {
    fn from_iter<I: IntoIterator<Item = W>>(words: I) -> Self {
        let mut lexicon = Lexicon::new();
        lexicon.extend(words);
        lexicon
    }
}

impl<C: Symbol, W: IntoWord<C>> Extend<W> for Lexicon<C> {
    fn extend<I: IntoIterator<Item = W>>(&mut self, words: I) {
        for word in words {
            self.insert(word);
        }
    }
}
