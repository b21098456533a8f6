use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use itertools::{Itertools, Position};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use super::graph::Lexicon;
use super::order::SymbolOrder;
use super::register::Register;
use super::state::State;
use super::symbol::Symbol;

/// Symbols of one word, held inline for typical word lengths.
pub type Word<C> = SmallVec<[C; 32]>;

/// Anything that spells a word (or a prefix, or a phrase) of a [`Lexicon`].
///
/// Strings spell `char` words; slices, vectors and arrays spell words over
/// their element type. Every method that takes a word accepts these directly.
pub trait IntoWord<C: Symbol> {
    /// Copies the symbols of this word into a [`Word`].
    fn collect_word(self) -> Word<C>;
}

macro_rules! impl_into_word_for_strings {
    ($($ty:ty),*) => {$(
        impl IntoWord<char> for $ty {
            fn collect_word(self) -> Word<char> {
                self.chars().collect()
            }
        }
    )*};
}

// `&&str` is what iterating a slice or array of string literals yields.
impl_into_word_for_strings!(&str, &&str, String, &String);

impl<C: Symbol> IntoWord<C> for &[C] {
    fn collect_word(self) -> Word<C> {
        Word::from_slice(self)
    }
}

impl<C: Symbol> IntoWord<C> for &Vec<C> {
    fn collect_word(self) -> Word<C> {
        Word::from_slice(self)
    }
}

impl<C: Symbol> IntoWord<C> for Vec<C> {
    fn collect_word(self) -> Word<C> {
        Word::from_vec(self)
    }
}

impl<C: Symbol, const N: usize> IntoWord<C> for [C; N] {
    fn collect_word(self) -> Word<C> {
        Word::from_slice(&self)
    }
}

/// Errors that can occur when building a lexicon from sorted input.
#[derive(Debug, PartialEq, Error)]
pub enum BuilderError<C: Symbol> {
    /// Words were not provided in strictly ascending order.
    ///
    /// Contains the two words that were out of order (previous word, current word).
    #[error("OrderError - {0:?} came before {1:?}")]
    Order(Vec<C>, Vec<C>),
}

/// Errors that can occur when loading a lexicon from a word list.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The word list could not be read.
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    /// The word list was not sorted.
    #[error(transparent)]
    Builder(#[from] BuilderError<char>),
}

struct BuildState<C: Symbol> {
    ch: C,
    state: State<C>,
}

/// A builder that constructs a minimal lexicon in a single pass over sorted words.
///
/// Words must be added in strictly ascending order. Only the path of the most
/// recent word is kept open; everything to its left is final and is registered
/// as soon as the next word diverges from it.
///
/// # Examples
///
/// ```
/// use lexicos::lexicon::builder::Builder;
///
/// let mut builder = Builder::<char>::new();
/// builder.add_word("BAKE").unwrap();
/// builder.add_word("CAKE").unwrap();
/// assert!(builder.add_word("ABLE").is_err());
///
/// let lexicon = builder.build();
/// assert!(lexicon.contains("CAKE"));
/// assert_eq!(lexicon.len(), 2);
/// ```
pub struct Builder<C: Symbol = char> {
    root: State<C>,
    build_state: Vec<BuildState<C>>,
    register: Register<C>,
    order: SymbolOrder<C>,
    len: usize,
}

impl<C: Symbol> Builder<C> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Builder {
            root: State::new(false),
            build_state: Vec::new(),
            register: Register::new(),
            order: SymbolOrder::new(),
            len: 0,
        }
    }

    /// Adds a word to the lexicon being constructed.
    ///
    /// Accepts any [`IntoWord`], such as `&str`, `&[u8]` or `[u8; 3]`.
    /// The empty word is accepted as the very first word only.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::Order` if the word is not strictly greater than the
    /// previously added word.
    pub fn add_word(&mut self, word: impl IntoWord<C>) -> Result<(), BuilderError<C>> {
        let word = word.collect_word();
        self.add_word_slice(&word)
    }

    fn add_word_slice(&mut self, word: &[C]) -> Result<(), BuilderError<C>> {
        let prefix_length = self.prefix_length(word)?;
        self.canonicalize_suffix(prefix_length);
        self.order.observe(&word[prefix_length..]);
        if word.is_empty() {
            self.root.set_final(true);
        }
        self.build_state.extend(
            word[prefix_length..]
                .iter()
                .copied()
                .with_position()
                .map(|(position, ch)| BuildState {
                    ch,
                    state: State::new(matches!(position, Position::Last | Position::Only)),
                }),
        );
        self.len += 1;
        Ok(())
    }

    fn prefix_length(&self, word: &[C]) -> Result<usize, BuilderError<C>> {
        if word.is_empty() && self.len > 0 {
            return Err(BuilderError::Order(self.previous_word(), Vec::new()));
        }
        let mut prefix_len = 0;
        for (i, &ch) in word.iter().enumerate() {
            let is_last = i == word.len() - 1;
            if let Some(prev_state) = self.build_state.get(prefix_len) {
                if ch > prev_state.ch {
                    break;
                }
                if ch < prev_state.ch || is_last {
                    return Err(BuilderError::Order(self.previous_word(), word.to_vec()));
                }
                prefix_len += 1;
            } else {
                break;
            }
        }
        Ok(prefix_len)
    }

    fn previous_word(&self) -> Vec<C> {
        self.build_state.iter().map(|e| e.ch).collect()
    }

    /// Registers the open path below `target_length`, deepest state first.
    fn canonicalize_suffix(&mut self, target_length: usize) {
        while self.build_state.len() > target_length {
            let Some(BuildState { ch, state }) = self.build_state.pop() else {
                break;
            };
            let child = self.register.canonicalize(state);
            self.open_parent().add_child(ch, child);
        }
    }

    fn open_parent(&mut self) -> &mut State<C> {
        match self.build_state.last_mut() {
            Some(parent) => &mut parent.state,
            None => &mut self.root,
        }
    }

    /// Finalizes the construction and returns the lexicon.
    ///
    /// This method consumes the builder and registers the last open path, so
    /// the result is minimal and ready for [`Lexicon::insert`] and [`Lexicon::delete`].
    pub fn build(mut self) -> Lexicon<C> {
        self.canonicalize_suffix(0);
        debug!(
            words = self.len,
            states = self.register.len() + 1,
            "built lexicon from sorted input"
        );
        Lexicon::from_parts(self.root, self.register, self.order, self.len)
    }
}

impl<C: Symbol> Default for Builder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a lexicon from an iterator of words.
///
/// Each word must implement [`IntoWord`], allowing this function to accept
/// `&str`, `String`, slices, vectors, arrays, or any other supported word type.
///
/// Words **must** be provided in strictly ascending order, or this function will
/// return an error. Use [`Lexicon::from_iter`](std::iter::FromIterator::from_iter)
/// for unordered input.
///
/// # Examples
///
/// ```
/// use lexicos::lexicon::builder::build_lexicon;
///
/// let lexicon = build_lexicon(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(lexicon.contains("BANANA"));
/// assert!(!lexicon.contains("APRICOT"));
///
/// let bytes = build_lexicon([vec![1u8, 2, 3], vec![1, 2, 4], vec![2, 3, 4]]).unwrap();
/// assert!(bytes.contains([1u8, 2, 4]));
/// assert!(!bytes.contains([1u8, 2]));
/// ```
pub fn build_lexicon<C, W>(words: impl IntoIterator<Item = W>) -> Result<Lexicon<C>, BuilderError<C>>
where
    C: Symbol,
    W: IntoWord<C>,
{
    let mut builder = Builder::new();
    for word in words {
        builder.add_word(word)?;
    }
    Ok(builder.build())
}

/// Builds a lexicon from a word list, one word per line.
///
/// Trailing whitespace is trimmed, empty lines are skipped and lines starting
/// with '#' are treated as comments. Words must be in sorted order.
pub fn build_lexicon_from_reader(mut reader: impl BufRead) -> Result<Lexicon<char>, LoadError> {
    let mut builder = Builder::new();

    // Instead of using BufRead::lines() we call read_line repeatedly, which lets
    // us reuse the same string instead of allocating a new one for every line.
    let mut buf = String::with_capacity(80);
    loop {
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let word = buf.trim_end();
        if !word.is_empty() && !is_comment(word) {
            builder.add_word(word)?;
        }
        buf.clear();
    }
    Ok(builder.build())
}

/// Builds a lexicon from a word-list file. See [`build_lexicon_from_reader`] for the format.
///
/// # Examples
///
/// ```no_run
/// use lexicos::lexicon::builder::build_lexicon_from_file;
///
/// let lexicon = build_lexicon_from_file("dictionary.txt").unwrap();
/// ```
pub fn build_lexicon_from_file(path: impl AsRef<Path>) -> Result<Lexicon<char>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let lexicon = build_lexicon_from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), words = lexicon.len(), "loaded word list");
    Ok(lexicon)
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
