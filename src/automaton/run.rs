use std::collections::VecDeque;

use tracing::trace;

use super::{Automaton, StateSet};
use crate::{
    math::{OrderedSet, Set},
    Show, Symbol,
};

impl Automaton {
    /// Returns true if and only if the automaton accepts the given finite word. The word is
    /// read by tracking the epsilon closed set of states that the automaton can be in, so this
    /// works for non-deterministic automata as well. Occurrences of ε in the word are skipped.
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let aut: Automaton = r#"
    ///     -> q0 : "a" -> q0, "a" -> q1
    ///      * q1 : "b" -> q1
    /// "#.parse().unwrap();
    /// assert!(aut.accepts(["a", "a", "b"]));
    /// assert!(!aut.accepts(["b"]));
    /// assert!(!aut.accepts(Vec::<Symbol>::new()));
    /// ```
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Into<Symbol>,
    {
        let mut current = self.epsilon_closure(self.start_state());
        for symbol in word {
            let symbol = symbol.into();
            if symbol.is_empty() {
                continue;
            }
            current = self.step(&current, &symbol);
            if current.is_empty() {
                trace!("run is stuck after reading {}", symbol.show());
                return false;
            }
        }
        self.contains_final(&current)
    }

    /// Searches for a shortest word on which `self` and `other` disagree, i.e. a word that is
    /// accepted by exactly one of the two automata. Returns `None` if the two automata accept
    /// the same language.
    ///
    /// Both automata are explored simultaneously in a breadth-first manner, where each of them
    /// tracks the epsilon closed set of states it can be in. The symbols that are considered are
    /// all non-empty symbols of both alphabets.
    pub fn separating_word(&self, other: &Automaton) -> Option<Vec<Symbol>> {
        let symbols: OrderedSet<&Symbol> = self
            .alphabet()
            .iter()
            .chain(other.alphabet().iter())
            .filter(|symbol| !symbol.is_empty())
            .collect();

        let initial = (
            self.epsilon_closure(self.start_state()),
            other.epsilon_closure(other.start_state()),
        );
        let mut seen: Set<(StateSet, StateSet)> = Set::default();
        let mut queue = VecDeque::new();
        seen.insert(initial.clone());
        queue.push_back((initial, Vec::new()));

        while let Some(((left, right), word)) = queue.pop_front() {
            if self.contains_final(&left) != other.contains_final(&right) {
                trace!(
                    "{} and {} are separated by {}",
                    left.show(),
                    right.show(),
                    word.show()
                );
                return Some(word);
            }
            for &symbol in &symbols {
                let successor = (self.step(&left, symbol), other.step(&right, symbol));
                if seen.insert(successor.clone()) {
                    let mut extended = word.clone();
                    extended.push(symbol.clone());
                    queue.push_back((successor, extended));
                }
            }
        }
        None
    }

    /// Returns true if `self` and `other` accept the same language, see
    /// [`Automaton::separating_word`].
    pub fn equivalent(&self, other: &Automaton) -> bool {
        self.separating_word(other).is_none()
    }
}
