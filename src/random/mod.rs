use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

/// Generates a random, usually non-deterministic, automaton with `size` states named
/// `q0, q1, ...` over an alphabet that consists of the first `symbols` lowercase letters.
/// The algorithm is as follows:
/// 1. The state `q0` is the start state and every state is final with probability 1/2. If no
///    state was chosen, a single random state is made final.
/// 2. For every state, every symbol and every potential target, the corresponding transition is
///    inserted with probability `density`.
/// 3. For every pair of distinct states, an epsilon transition is inserted with probability
///    `epsilon_probability`. If at least one was inserted, ε belongs to the alphabet.
///
/// Note that, depending on the drawn transitions, there may be unreachable states and the final
/// states need not be reachable at all.
///
/// Panics if `size` is zero or if `symbols` exceeds the number of lowercase letters.
pub fn generate_random_nfa(
    size: usize,
    symbols: usize,
    density: f64,
    epsilon_probability: f64,
) -> Automaton {
    assert!(size > 0, "an automaton needs at least one state");
    assert!(symbols <= 26, "only lowercase letters are used as symbols");

    let states = (0..size).map(|i| State::of(format!("q{i}"))).collect_vec();
    let mut alphabet: Set<Symbol> = (b'a'..)
        .take(symbols)
        .map(|c| Symbol::from(c as char))
        .collect();

    let mut final_states = states
        .iter()
        .filter(|_| fastrand::bool())
        .cloned()
        .collect_vec();
    if final_states.is_empty() {
        final_states.push(states[fastrand::usize(..size)].clone());
    }

    let mut transitions = Vec::new();
    for source in &states {
        for symbol in alphabet.iter().sorted() {
            for target in &states {
                if fastrand::f64() < density {
                    transitions.push(Transition::new(source, symbol, target));
                }
            }
        }
        for target in states.iter().filter(|q| *q != source) {
            if fastrand::f64() < epsilon_probability {
                transitions.push(Transition::new(source, Symbol::EPSILON, target));
            }
        }
    }
    if transitions.iter().any(Transition::is_epsilon) {
        alphabet.insert(Symbol::EPSILON);
    }

    debug!(
        "generated random automaton with {size} states and {} transitions",
        transitions.len()
    );
    Automaton::new(
        alphabet,
        states.iter().cloned(),
        final_states,
        states[0].clone(),
        transitions,
    )
    .expect("randomly generated automaton only refers to known states and symbols")
}

/// Generate a random word over the non-epsilon symbols of the `alphabet`.
/// The length of the word is drawn uniformly from the range `min_len..=max_len`. If the
/// alphabet contains no such symbol, the word is empty.
///
/// Panics if `min_len` exceeds `max_len`.
pub fn generate_random_word(alphabet: &Set<Symbol>, min_len: usize, max_len: usize) -> Vec<Symbol> {
    assert!(
        min_len <= max_len,
        "minimal word length {min_len} exceeds maximal length {max_len}"
    );
    let charset = alphabet
        .iter()
        .filter(|s| !s.is_empty())
        .sorted()
        .collect_vec();
    if charset.is_empty() {
        return vec![];
    }

    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())].clone())
        .collect()
}

/// Generate `number` random words over the non-epsilon symbols of the `alphabet`, see
/// [`generate_random_word`]. The words need not be distinct.
///
/// Panics if `min_len` exceeds `max_len`.
pub fn generate_random_words(
    alphabet: &Set<Symbol>,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<Symbol>> {
    (0..number)
        .map(|_| generate_random_word(alphabet, min_len, max_len))
        .collect()
}
