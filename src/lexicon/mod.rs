/// Word conversion, bulk construction from sorted input and word-list loading.
pub mod builder;
pub mod flat;
/// The lexicon automaton and its insert/delete operations.
pub mod graph;
mod order;
mod query;
/// Canonical-state register used to keep the automaton minimal.
pub(crate) mod register;
/// Read-only views of a lexicon at a point in time.
pub mod snapshot;
/// Automaton states and their transitions.
pub mod state;
/// Trait for types that can serve as transition labels.
pub mod symbol;

pub use builder::{BuilderError, IntoWord, LoadError, Word};
pub use flat::{FlatGraph, StateId};
pub use graph::Lexicon;
pub use snapshot::Snapshot;
pub use state::State;
pub use symbol::Symbol;
