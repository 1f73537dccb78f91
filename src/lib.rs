//! Library for working with finite automata and context-free grammars in Rust.
//!
//! The central type is [`Automaton`], a finite state machine over string-labelled
//! [`State`]s and [`Symbol`]s. An automaton consists of an alphabet, a set of states, a
//! designated start state, a non-empty set of accepting (final) states and a set of
//! [`Transition`]s. Transitions may be labelled with the empty symbol [`Symbol::EPSILON`],
//! which represents a move that does not consume any input. All of these are plain values:
//! they are compared, ordered and hashed by content, and an automaton never changes once it
//! has been constructed.
//!
//! Construction always goes through validation, see [`Automaton::new`] and
//! [`Automaton::from_transitions`]. The operations that transform an automaton produce a fresh
//! one, most notably [`Automaton::determinize`] which implements the classic subset
//! construction. Sets of states are collapsed into a single state through [`State::merge`],
//! which names the merged state canonically (e.g. `{q0, q1}`) so that equal sets always
//! end up as equal states.
//!
//! Automata can be read from and written to a small textual notation, see the [`notation`]
//! module. A line describes one state, its optional modifier and its outgoing transitions:
//! ```
//! use grammar_tool::prelude::*;
//!
//! let nfa: Automaton = r#"
//!     -> q0 : "" -> q1, "b" -> q2
//!        q1 : "a" -> q2, "c" -> q1
//!        q2 : "d" -> q2, "d" -> q3
//!      * q3 : "c" -> q0
//! "#
//! .parse()
//! .unwrap();
//! assert!(!nfa.is_deterministic());
//!
//! let dfa = nfa.determinize().unwrap();
//! assert!(dfa.is_deterministic());
//! assert!(dfa.equivalent(&nfa));
//! ```
//!
//! The [`grammar`] module contains a data model for context-free grammars, which shares
//! the [`Symbol`] type with the automata.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use grammar_tool::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, InvalidAutomatonError, State, Transition},
        grammar::{ContextFreeGrammar, GrammarError, ProductionRule},
        math,
        math::{Map, OrderedSet, Set},
        notation::FormatError,
        symbol::Symbol,
        Show,
    };
}

/// This module contains type aliases for the collections that are used throughout the crate.
pub mod math;

/// Defines the [`Symbol`] type, which is shared by automata and grammars.
pub mod symbol;
pub use symbol::Symbol;

/// Defines finite automata together with the operations on them.
pub mod automaton;
pub use automaton::{Automaton, State, Transition};

pub mod notation;

/// Context-free grammars, their production rules and the productive form.
pub mod grammar;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, symbols, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state this is simply its
    /// name, the empty symbol is shown as `ε` and a transition is shown as `(q0, a, q1)`.
    /// This is mainly used for logging and the transition table.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!(
            "\"{}\"",
            itertools::Itertools::join(&mut self.iter().map(|x| x.show()), "")
        )
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
