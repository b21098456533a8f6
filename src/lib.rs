//! # lexicos
//!
//! A word lexicon stored as a minimal [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph) that stays minimal under insertion and deletion.
//!
//! A DAWG is a trie whose equivalent subtrees are merged, so common suffixes are
//! stored once. Each [`insert`](Lexicon::insert) and [`delete`](Lexicon::delete)
//! rebuilds only the path to the changed word, reusing every other state, and
//! re-minimizes that path against a register of canonical states
//! ([Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1)).
//!
//! ## Features
//!
//! - **Generic over symbol type**: works with `char`, `u8`, `u16`, or any type implementing
//!   [`Symbol`](lexicon::Symbol)
//! - **Always minimal**: no two states accept the same set of suffixes
//! - **Snapshots**: states are immutable once shared, so a [`Snapshot`](lexicon::Snapshot)
//!   keeps answering queries, from any thread, while the lexicon changes
//! - **Queries**: membership, prefix lookup, and scanning a phrase for words at an offset
//!
//! ## Quick Start
//!
//! ```
//! use lexicos::Lexicon;
//!
//! let mut lexicon = Lexicon::new();
//! lexicon.insert("x");
//! lexicon.insert("yz");
//! assert_eq!(lexicon.to_string(), "(x$|yz$)");
//!
//! assert!(lexicon.contains("yz"));
//! assert!(!lexicon.contains("y"));
//!
//! let words: Vec<String> = lexicon.words("xyz", 1);
//! assert_eq!(words, ["yz"]);
//! ```
//!
//! Sorted input can be built in a single pass:
//!
//! ```
//! use lexicos::Lexicon;
//!
//! let lexicon = Lexicon::from_sorted(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
//! let root = lexicon.root();
//!
//! // All five words share the state after their first letter.
//! let bake = root.get('B').unwrap();
//! let make = root.get('M').unwrap();
//! assert!(std::ptr::eq(bake, make));
//! ```
//!
//! ## Generic Usage
//!
//! ```
//! use lexicos::Lexicon;
//!
//! let mut lexicon: Lexicon<u8> = Lexicon::new();
//! lexicon.insert(b"abc".as_slice());
//! lexicon.insert(b"abd".as_slice());
//! assert!(lexicon.contains(b"abd".as_slice()));
//!
//! let words: Vec<Vec<u8>> = lexicon.lookup(b"ab".as_slice());
//! assert_eq!(words, [b"abc".to_vec(), b"abd".to_vec()]);
//! ```

#![warn(missing_docs)]

/// Lexicon automaton: states, register, builder and queries.
pub mod lexicon;

pub use lexicon::{Lexicon, Snapshot, Symbol};
