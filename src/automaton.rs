use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::{
    math::{self, Map, OrderedSet, Set},
    Show, Symbol,
};

mod state;
pub use state::State;

mod transition;
pub use transition::Transition;

/// Implements the subset construction, see [`Automaton::determinize`].
mod subset;

/// Running words on an automaton and deciding language equivalence.
mod run;

/// Renders the transition table of an automaton.
mod table;

/// A set of states of an automaton. It is ordered, so that a set of states can itself be
/// used as a key and so that it can be collapsed canonically through [`State::merge`].
pub type StateSet = OrderedSet<State>;

/// Represents the ways in which the components of an [`Automaton`] can be inconsistent.
/// Each variant carries the offending element.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InvalidAutomatonError {
    /// The start state is not an element of the set of states.
    #[error("start state `{0}` is not an element of the set of states")]
    StartStateUnknown(State),
    /// A final state is not an element of the set of states.
    #[error("final state `{0}` is not an element of the set of states")]
    FinalStateUnknown(State),
    /// There are no final states, but every automaton needs at least one.
    #[error("there must be at least one final state")]
    NoFinalStates,
    /// The source of a transition is not an element of the set of states.
    #[error("source state of transition `{0}` is not an element of the set of states")]
    TransitionSourceUnknown(Transition),
    /// The target of a transition is not an element of the set of states.
    #[error("target state of transition `{0}` is not an element of the set of states")]
    TransitionTargetUnknown(Transition),
    /// The symbol of a transition does not belong to the alphabet.
    #[error("symbol of transition `{0}` is not in the alphabet")]
    SymbolNotInAlphabet(Transition),
    /// Two different sets of states collapse to the same merged state, which happens when an
    /// automaton already contains a state whose name looks like a merged state.
    #[error("merged state `{0}` would stand for two different sets of states")]
    AmbiguousMergedState(State),
}

/// A finite automaton over an alphabet of [`Symbol`]s, which may be non-deterministic and may
/// contain epsilon transitions. It consists of
/// - an alphabet, which may contain [`Symbol::EPSILON`] to allow epsilon transitions,
/// - a set of [`State`]s with a designated start state,
/// - a non-empty set of final (accepting) states and
/// - a set of [`Transition`]s between the states.
///
/// An automaton is validated upon construction and never changes afterwards. Operations like
/// [`Automaton::determinize`] produce a new automaton. Two automata are equal if all of their
/// components are equal as sets.
#[derive(Clone, Debug)]
pub struct Automaton {
    alphabet: Set<Symbol>,
    states: Set<State>,
    final_states: Set<State>,
    start_state: State,
    transitions: Set<Transition>,
    successors: Map<State, Map<Symbol, StateSet>>,
}

impl Automaton {
    /// Creates a new automaton from its components. The following conditions are checked in
    /// order, and the first one that is violated is reported as an [`InvalidAutomatonError`]:
    /// 1. the start state belongs to `states`,
    /// 2. every final state belongs to `states`,
    /// 3. there is at least one final state,
    /// 4. source and target of every transition belong to `states`,
    /// 5. the symbol of every transition belongs to `alphabet`.
    ///
    /// # Example
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let aut = Automaton::new(
    ///     [Symbol::of("a")],
    ///     [State::of("q0"), State::of("q1")],
    ///     [State::of("q1")],
    ///     State::of("q0"),
    ///     [Transition::new("q0", "a", "q1")],
    /// );
    /// assert!(aut.is_ok());
    ///
    /// let aut = Automaton::new([Symbol::of("a")], [State::of("q0")], [], State::of("q0"), []);
    /// assert_eq!(aut.unwrap_err(), InvalidAutomatonError::NoFinalStates);
    /// ```
    pub fn new<A, Q, F, T>(
        alphabet: A,
        states: Q,
        final_states: F,
        start_state: State,
        transitions: T,
    ) -> Result<Self, InvalidAutomatonError>
    where
        A: IntoIterator<Item = Symbol>,
        Q: IntoIterator<Item = State>,
        F: IntoIterator<Item = State>,
        T: IntoIterator<Item = Transition>,
    {
        let alphabet: Set<Symbol> = alphabet.into_iter().collect();
        let states: Set<State> = states.into_iter().collect();
        let final_states: Set<State> = final_states.into_iter().collect();
        let transitions: Set<Transition> = transitions.into_iter().collect();

        if !states.contains(&start_state) {
            return Err(InvalidAutomatonError::StartStateUnknown(start_state));
        }
        if let Some(q) = final_states
            .iter()
            .sorted()
            .find(|q| !states.contains(*q))
        {
            return Err(InvalidAutomatonError::FinalStateUnknown(q.clone()));
        }
        if final_states.is_empty() {
            return Err(InvalidAutomatonError::NoFinalStates);
        }

        let sorted = transitions.iter().sorted().collect_vec();
        for t in &sorted {
            if !states.contains(t.source()) {
                return Err(InvalidAutomatonError::TransitionSourceUnknown((*t).clone()));
            }
            if !states.contains(t.target()) {
                return Err(InvalidAutomatonError::TransitionTargetUnknown((*t).clone()));
            }
        }
        if let Some(t) = sorted.iter().find(|t| !alphabet.contains(t.symbol())) {
            return Err(InvalidAutomatonError::SymbolNotInAlphabet((*t).clone()));
        }

        let mut successors: Map<State, Map<Symbol, StateSet>> = Map::default();
        for t in &transitions {
            successors
                .entry(t.source().clone())
                .or_default()
                .entry(t.symbol().clone())
                .or_default()
                .insert(t.target().clone());
        }

        Ok(Self {
            alphabet,
            states,
            final_states,
            start_state,
            transitions,
            successors,
        })
    }

    /// Builds an automaton from the given transitions, where the set of states and the alphabet
    /// are derived: the states are all sources and targets of transitions together with the
    /// start state and the final states, the alphabet consists of all symbols that appear on
    /// some transition. The result is then validated as in [`Automaton::new`].
    pub fn from_transitions<T, F>(
        start_state: State,
        transitions: T,
        final_states: F,
    ) -> Result<Self, InvalidAutomatonError>
    where
        T: IntoIterator<Item = Transition>,
        F: IntoIterator<Item = State>,
    {
        let transitions: Set<Transition> = transitions.into_iter().collect();
        let final_states: Set<State> = final_states.into_iter().collect();

        let mut states: Set<State> = final_states.iter().cloned().collect();
        states.insert(start_state.clone());
        let mut alphabet = Set::default();
        for t in &transitions {
            states.insert(t.source().clone());
            states.insert(t.target().clone());
            alphabet.insert(t.symbol().clone());
        }

        Self::new(alphabet, states, final_states, start_state, transitions)
    }

    /// Returns a reference to the alphabet.
    pub fn alphabet(&self) -> &Set<Symbol> {
        &self.alphabet
    }

    /// Returns a reference to the set of all states.
    pub fn states(&self) -> &Set<State> {
        &self.states
    }

    /// Returns a reference to the set of final states.
    pub fn final_states(&self) -> &Set<State> {
        &self.final_states
    }

    /// Returns the start state.
    pub fn start_state(&self) -> &State {
        &self.start_state
    }

    /// Returns a reference to the set of all transitions.
    pub fn transitions(&self) -> &Set<Transition> {
        &self.transitions
    }

    /// Returns the number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns true if and only if `state` is a final state.
    pub fn is_final(&self, state: &State) -> bool {
        self.final_states.contains(state)
    }

    /// Iterates over the targets of transitions leaving `state` on `symbol`.
    fn targets<'a>(
        &'a self,
        state: &State,
        symbol: &Symbol,
    ) -> impl Iterator<Item = &'a State> + 'a {
        self.successors
            .get(state)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .into_iter()
            .flatten()
    }

    /// Returns all transitions that originate in `state`.
    pub fn transitions_from(&self, state: &State) -> OrderedSet<Transition> {
        self.successors
            .get(state)
            .into_iter()
            .flatten()
            .flat_map(|(symbol, targets)| {
                targets
                    .iter()
                    .map(move |target| Transition::new(state, symbol, target))
            })
            .collect()
    }

    /// Returns the set of states that can be reached from `state` through a single transition
    /// labelled with exactly `symbol`. Epsilon transitions are not taken into account, unless
    /// `symbol` is itself ε.
    pub fn next_states(&self, state: &State, symbol: &Symbol) -> StateSet {
        self.targets(state, symbol).cloned().collect()
    }

    /// Computes the union of [`Automaton::next_states`] over all given states.
    pub fn next_states_of_set<'a, I>(&self, states: I, symbol: &Symbol) -> StateSet
    where
        I: IntoIterator<Item = &'a State>,
    {
        states
            .into_iter()
            .flat_map(|q| self.targets(q, symbol))
            .cloned()
            .collect()
    }

    /// Returns `state` together with all states that are reachable from it through exactly one
    /// epsilon transition. Longer chains of epsilon transitions are not followed, for that use
    /// [`Automaton::epsilon_closure`].
    pub fn epsilon_step(&self, state: &State) -> StateSet {
        self.epsilon_step_of_set(std::iter::once(state))
    }

    /// Returns the given states together with all states that are reachable from one of them
    /// through exactly one epsilon transition.
    pub fn epsilon_step_of_set<'a, I>(&self, states: I) -> StateSet
    where
        I: IntoIterator<Item = &'a State>,
    {
        let mut out = StateSet::new();
        for q in states {
            out.extend(self.targets(q, &Symbol::EPSILON).cloned());
            out.insert(q.clone());
        }
        out
    }

    /// Computes the epsilon closure of `state`, which is the set of all states that can be
    /// reached from `state` by taking any number of epsilon transitions (including none).
    pub fn epsilon_closure(&self, state: &State) -> StateSet {
        self.epsilon_closure_of_set(std::iter::once(state))
    }

    /// Computes the epsilon closure of a set of states, that is the least superset of `states`
    /// which is closed under [`Automaton::epsilon_step_of_set`].
    pub fn epsilon_closure_of_set<'a, I>(&self, states: I) -> StateSet
    where
        I: IntoIterator<Item = &'a State>,
    {
        let mut closure: StateSet = states.into_iter().cloned().collect();
        let mut queue = closure.iter().cloned().collect_vec();
        while let Some(q) = queue.pop() {
            for p in self.targets(&q, &Symbol::EPSILON) {
                if closure.insert(p.clone()) {
                    queue.push(p.clone());
                }
            }
        }
        closure
    }

    /// Reads `symbol` from the set of states `current`, which means the epsilon closure of all
    /// states reached via a `symbol`-transition from some state of `current`.
    pub(crate) fn step(&self, current: &StateSet, symbol: &Symbol) -> StateSet {
        self.epsilon_closure_of_set(&self.next_states_of_set(current, symbol))
    }

    /// Returns true if `states` contains at least one final state.
    pub(crate) fn contains_final(&self, states: &StateSet) -> bool {
        math::intersects(states, &self.final_states)
    }

    /// Returns true if the automaton is deterministic. That is the case if no state has an
    /// outgoing epsilon transition and for every state and symbol, at most one state can be
    /// reached, where the reached states are closed under epsilon transitions.
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let dfa: Automaton = "-> q0 : \"a\" -> q1\n * q1".parse().unwrap();
    /// assert!(dfa.is_deterministic());
    /// ```
    pub fn is_deterministic(&self) -> bool {
        for state in self.states.iter().sorted() {
            for symbol in self.alphabet.iter().sorted() {
                let reached = self.epsilon_closure_of_set(&self.next_states(state, symbol));
                if symbol.is_empty() && !reached.is_empty() {
                    trace!(
                        "found epsilon transition from {} to {}",
                        state.show(),
                        reached.show()
                    );
                    return false;
                }
                if reached.len() > 1 {
                    trace!(
                        "found multiple successors of {} on {}: {}",
                        state.show(),
                        symbol.show(),
                        reached.show()
                    );
                    return false;
                }
            }
        }
        true
    }
}

impl PartialEq for Automaton {
    fn eq(&self, other: &Self) -> bool {
        self.start_state == other.start_state
            && self.alphabet == other.alphabet
            && self.states == other.states
            && self.final_states == other.final_states
            && self.transitions == other.transitions
    }
}

impl Eq for Automaton {}
