use std::fmt::Display;

use itertools::Itertools;

use crate::{math::OrderedSet, Show};

/// A state of an [`Automaton`](crate::Automaton), identified by its (trimmed) name. States
/// are plain values, they are compared and ordered lexicographically by name and know
/// nothing about the automaton they belong to.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct State(String);

impl State {
    /// Creates a new state with the given name, surrounding whitespace is removed.
    pub fn of<S: AsRef<str>>(name: S) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Collapses a collection of states into a single state, returns `None` if the collection
    /// is empty. A single state is returned as is, otherwise the names of the distinct states
    /// are sorted, joined by `", "` and surrounded by braces. The order in which the states
    /// are given and duplicates among them do not influence the result.
    /// ```
    /// use grammar_tool::State;
    ///
    /// let merged = State::try_merge(&[State::of("q2"), State::of("q1"), State::of("q2")]);
    /// assert_eq!(merged, Some(State::of("{q1, q2}")));
    /// assert_eq!(State::try_merge(&[State::of("q0")]), Some(State::of("q0")));
    /// assert_eq!(State::try_merge(&[]), None);
    /// ```
    pub fn try_merge<'a, I>(states: I) -> Option<State>
    where
        I: IntoIterator<Item = &'a State>,
    {
        let states: OrderedSet<&State> = states.into_iter().collect();
        match states.len() {
            0 => None,
            1 => states.into_iter().next().cloned(),
            _ => Some(State(format!(
                "{{{}}}",
                states.into_iter().map(State::name).join(", ")
            ))),
        }
    }

    /// Works like [`State::try_merge`], but panics if no state is given. Subset constructions
    /// never produce an empty set of states, so hitting the panic indicates a bug in the caller.
    pub fn merge<'a, I>(states: I) -> State
    where
        I: IntoIterator<Item = &'a State>,
    {
        match Self::try_merge(states) {
            Some(merged) => merged,
            None => panic!("cannot merge an empty set of states"),
        }
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

impl From<&State> for State {
    fn from(value: &State) -> Self {
        value.clone()
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Show for State {
    fn show(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::State;
    use crate::math::OrderedSet;

    #[test]
    fn merge_is_canonical() {
        let (q1, q2) = (State::of("q1"), State::of("q2"));
        let left = State::merge(&[q1.clone(), q2.clone()]);
        let right = State::merge(&[q2.clone(), q1.clone()]);
        assert_eq!(left, right);
        assert_eq!(left.name(), "{q1, q2}");

        let set: OrderedSet<State> = [q2, q1].into_iter().collect();
        assert_eq!(State::merge(&set), left);
    }

    #[test]
    fn merge_of_singleton_is_identity() {
        let q = State::of(" q0 ");
        assert_eq!(q.name(), "q0");
        assert_eq!(State::merge(&[q.clone(), q.clone()]), q);
    }

    #[test]
    #[should_panic(expected = "cannot merge an empty set of states")]
    fn merge_of_nothing_panics() {
        State::merge(&OrderedSet::new());
    }

    #[test]
    fn merged_states_order_like_names() {
        let merged = State::merge(&[State::of("q1"), State::of("q0")]);
        assert!(State::of("q0") < State::of("q1"));
        assert!(merged > State::of("q1"), "braces sort after lowercase letters");
    }
}
