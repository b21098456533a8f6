use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait for types that can label a transition in a [`Lexicon`](super::Lexicon).
///
/// This trait is automatically implemented for any type satisfying all the
/// required bounds (`char`, `u8`, `u16`, `u32`, etc.).
///
/// - `Copy`: transitions store labels by value
/// - `Eq + Ord`: comparing labels and ordering state signatures
/// - `Hash`: state deduplication in the register
/// - `Debug`: error messages and debug printing of states
/// - `Display`: the textual rendering of the automaton
pub trait Symbol: Copy + Eq + Ord + Hash + Debug + Display {}

impl<T: Copy + Eq + Ord + Hash + Debug + Display> Symbol for T {}
