//! Read-only traversals shared by [`Lexicon`](super::Lexicon) and [`Snapshot`](super::Snapshot).

use std::fmt;

use smallvec::SmallVec;

use super::order::SymbolOrder;
use super::state::State;
use super::symbol::Symbol;

impl<C: Symbol> State<C> {
    /// Follows `word` from this state and returns the state it ends in, if the whole path exists.
    #[inline]
    pub fn walk(&self, word: &[C]) -> Option<&State<C>> {
        word.iter().try_fold(self, |state, &ch| state.get(ch))
    }

    /// Returns true if `suffix` leads from this state to a final state.
    #[inline]
    pub fn has_suffix(&self, suffix: &[C]) -> bool {
        self.walk(suffix).is_some_and(State::is_final)
    }

    /// Collects every word below this state that starts with `prefix`, in ascending order.
    pub(crate) fn complete<W: FromIterator<C>>(&self, prefix: &[C]) -> Vec<W> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut words = Vec::new();
        let mut buffer = prefix.to_vec();
        if start.is_final() {
            words.push(buffer.iter().copied().collect());
        }

        // Depth-first, smallest symbol first, so the output comes out sorted.
        let mut stack = Vec::new();
        push_children(&mut stack, start, prefix.len());
        while let Some((depth, ch, state)) = stack.pop() {
            buffer.truncate(depth);
            buffer.push(ch);
            if state.is_final() {
                words.push(buffer.iter().copied().collect());
            }
            push_children(&mut stack, state, depth + 1);
        }
        words
    }

    /// Collects every word that is a non-empty prefix of `phrase[offset..]`, shortest first.
    pub(crate) fn prefixes_of<W: FromIterator<C>>(&self, phrase: &[C], offset: usize) -> Vec<W> {
        let Some(rest) = phrase.get(offset..) else {
            return Vec::new();
        };

        let mut words = Vec::new();
        let mut state = self;
        for (i, &ch) in rest.iter().enumerate() {
            match state.get(ch) {
                Some(next) => state = next,
                None => break,
            }
            if state.is_final() {
                words.push(rest[..=i].iter().copied().collect());
            }
        }
        words
    }
}

fn push_children<'s, C: Symbol>(
    stack: &mut Vec<(usize, C, &'s State<C>)>,
    state: &'s State<C>,
    depth: usize,
) {
    stack.extend(state.children().rev().map(|(ch, child)| (depth, ch, child)));
}

enum Token<'s, C: Symbol> {
    Text(&'static str),
    Edge(C, &'s State<C>),
}

/// Renders the automaton below `root` as a regular-expression-like string.
///
/// Each transition renders as its symbol, a `$` if the target is final, and the
/// rendering of the target. A single transition renders bare; several are joined
/// with `|` and wrapped in parentheses, listed in `order`.
pub(crate) fn render<C: Symbol>(
    root: &State<C>,
    order: &SymbolOrder<C>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut stack = Vec::new();
    push_tokens(&mut stack, root, order);
    while let Some(token) = stack.pop() {
        match token {
            Token::Text(text) => f.write_str(text)?,
            Token::Edge(ch, child) => {
                write!(f, "{ch}")?;
                if child.is_final() {
                    f.write_str("$")?;
                }
                push_tokens(&mut stack, child, order);
            }
        }
    }
    Ok(())
}

/// Pushes the rendering of `state`'s transitions, last token first.
fn push_tokens<'s, C: Symbol>(
    stack: &mut Vec<Token<'s, C>>,
    state: &'s State<C>,
    order: &SymbolOrder<C>,
) {
    let mut edges: SmallVec<[(C, &'s State<C>); 8]> = state.children().collect();
    edges.sort_unstable_by_key(|&(ch, _)| order.key(ch));
    let grouped = edges.len() > 1;
    if grouped {
        stack.push(Token::Text(")"));
    }
    for (i, (ch, child)) in edges.into_iter().enumerate().rev() {
        stack.push(Token::Edge(ch, child));
        if i > 0 {
            stack.push(Token::Text("|"));
        }
    }
    if grouped {
        stack.push(Token::Text("("));
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;

    /// A plain trie over `words`, built without any sharing.
    fn trie(words: &[&str]) -> State<char> {
        fn insert(state: &State<char>, word: &[char]) -> State<char> {
            let Some((&ch, rest)) = word.split_first() else {
                return state.with_final(true);
            };
            match state.get(ch) {
                Some(child) => state.with_replaced_child(ch, Arc::new(insert(child, rest))),
                None => state.with_added_child(ch, Arc::new(insert(&State::new(false), rest))),
            }
        }
        words.iter().fold(State::new(false), |root, word| {
            insert(&root, &word.chars().collect::<Vec<_>>())
        })
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    struct Rendering(State<char>, SymbolOrder<char>);

    impl fmt::Display for Rendering {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            render(&self.0, &self.1, f)
        }
    }

    /// Renders `words` as a plain trie, ranking symbols in insertion order.
    fn rendered(words: &[&str]) -> String {
        let mut order = SymbolOrder::new();
        for word in words {
            order.observe(&chars(word));
        }
        Rendering(trie(words), order).to_string()
    }

    #[test]
    fn walk_and_has_suffix() {
        let root = trie(&["car", "cart"]);
        assert!(root.walk(&chars("ca")).is_some());
        assert!(root.walk(&chars("cb")).is_none());
        assert!(root.has_suffix(&chars("car")));
        assert!(!root.has_suffix(&chars("ca")));
        assert!(root.walk(&chars("car")).unwrap().has_suffix(&chars("t")));
        assert!(root.walk(&[]).is_some_and(|state| std::ptr::eq(state, &root)));
    }

    #[test]
    fn complete_is_sorted_and_includes_prefix() {
        let root = trie(&["he", "hello", "help", "hat", "world"]);
        let words: Vec<String> = root.complete(&chars("he"));
        assert_eq!(words, ["he", "hello", "help"]);
        let words: Vec<String> = root.complete(&[]);
        assert_eq!(words, ["hat", "he", "hello", "help", "world"]);
        let words: Vec<String> = root.complete(&chars("x"));
        assert!(words.is_empty());
    }

    #[test]
    fn prefixes_of_scans_from_offset() {
        let root = trie(&["he", "head", "ad"]);
        let phrase = chars("head");
        let words: Vec<String> = root.prefixes_of(&phrase, 0);
        assert_eq!(words, ["he", "head"]);
        let words: Vec<String> = root.prefixes_of(&phrase, 2);
        assert_eq!(words, ["ad"]);
        let words: Vec<String> = root.prefixes_of(&phrase, 4);
        assert!(words.is_empty());
        let words: Vec<String> = root.prefixes_of(&phrase, 9);
        assert!(words.is_empty());
    }

    #[test]
    fn render_follows_symbol_rank() {
        assert_eq!(rendered(&[]), "");
        assert_eq!(rendered(&["x", "yz"]), "(x$|yz$)");
        assert_eq!(rendered(&["yz", "x"]), "(yz$|x$)");
        assert_eq!(rendered(&["ab", "a"]), "a$b$");
        // "qa" is added last but 'a' was ranked by "pa".
        assert_eq!(rendered(&["pa", "pb", "qc", "qb", "qa"]), "(p(a$|b$)|q(a$|b$|c$))");
    }

    #[test]
    fn render_long_word_without_recursion() {
        let mut state = State::new(true);
        for _ in 0..300_000 {
            state = State::new(false).with_added_child('a', Arc::new(state));
        }
        let mut order = SymbolOrder::new();
        order.observe(&['a']);
        let text = Rendering(state, order).to_string();
        assert_eq!(text.len(), 300_001);
        assert!(text.ends_with("aa$"));
    }
}
