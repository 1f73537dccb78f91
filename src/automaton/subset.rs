use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use super::{Automaton, InvalidAutomatonError, StateSet};
use crate::{
    math::{Map, Set},
    Show, State, Transition,
};

impl Automaton {
    /// Computes a deterministic automaton that accepts the same language as `self`, using the
    /// subset construction. Each state of the result corresponds to an epsilon closed set of
    /// states of `self` and is named by [`State::merge`]-ing that set, so a set consisting of a
    /// single state `q` simply becomes `q`. Only sets that are reachable from the epsilon
    /// closure of the start state are constructed and the result need not be complete: if a
    /// symbol leads nowhere from some set, the corresponding state has no transition on it.
    ///
    /// This fails when no final state is reachable from the start state, as the result would
    /// then have no final states. It also fails with
    /// [`InvalidAutomatonError::AmbiguousMergedState`] if a state of `self` is named like a
    /// merged state, e.g. `{q0, q1}`, and that name is also produced for a different set.
    ///
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let nfa: Automaton = r#"
    ///     -> q0 : "a" -> q0, "a" -> q1
    ///      * q1
    /// "#.parse().unwrap();
    /// let dfa = nfa.determinize().unwrap();
    /// assert!(dfa.is_deterministic());
    /// assert!(dfa.states().contains(&State::of("{q0, q1}")));
    /// ```
    pub fn determinize(&self) -> Result<Automaton, InvalidAutomatonError> {
        let symbols = self
            .alphabet()
            .iter()
            .filter(|symbol| !symbol.is_empty())
            .sorted()
            .collect_vec();

        let mut labels: Map<State, StateSet> = Map::default();
        let initial = self.epsilon_closure(self.start_state());
        let start_state = label(&mut labels, &initial)?;

        let mut final_states = Set::default();
        let mut transitions = Set::default();
        let mut seen: Set<StateSet> = Set::default();
        let mut queue = VecDeque::new();

        seen.insert(initial.clone());
        queue.push_back(initial);

        while let Some(current) = queue.pop_front() {
            let source = label(&mut labels, &current)?;
            if self.contains_final(&current) {
                final_states.insert(source.clone());
            }

            for &symbol in &symbols {
                let reached = self.step(&current, symbol);
                if reached.is_empty() {
                    continue;
                }
                let target = label(&mut labels, &reached)?;
                trace!(
                    "adding transition {}",
                    Transition::new(&source, symbol, &target).show()
                );
                transitions.insert(Transition::new(&source, symbol, &target));

                if !seen.contains(&reached) {
                    seen.insert(reached.clone());
                    queue.push_back(reached);
                }
            }
        }

        debug!(
            "subset construction produced {} states and {} transitions from {} states",
            seen.len(),
            transitions.len(),
            self.state_count()
        );
        Automaton::from_transitions(start_state, transitions, final_states)
    }
}

/// Merges `states` into a single state and remembers which set the name stands for.
fn label(
    labels: &mut Map<State, StateSet>,
    states: &StateSet,
) -> Result<State, InvalidAutomatonError> {
    let merged = State::merge(states);
    match labels.get(&merged) {
        Some(known) if known != states => Err(InvalidAutomatonError::AmbiguousMergedState(merged)),
        Some(_) => Ok(merged),
        None => {
            labels.insert(merged.clone(), states.clone());
            Ok(merged)
        }
    }
}
