use std::fmt::Display;

use crate::{Show, State, Symbol};

/// A transition of an [`Automaton`](crate::Automaton), which leads from a `source` state to a
/// `target` state when reading `symbol`. If the symbol is ε, it is an epsilon transition.
///
/// Transitions are ordered by source, then symbol and finally target. This ordering is only used
/// to enumerate and print transitions in a deterministic order.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Transition {
    source: State,
    symbol: Symbol,
    target: State,
}

impl Transition {
    /// Creates a new transition with the given source, symbol and target.
    pub fn new<X, S, Y>(source: X, symbol: S, target: Y) -> Self
    where
        X: Into<State>,
        S: Into<Symbol>,
        Y: Into<State>,
    {
        Self {
            source: source.into(),
            symbol: symbol.into(),
            target: target.into(),
        }
    }

    /// Returns the state in which the transition originates.
    pub fn source(&self) -> &State {
        &self.source
    }

    /// Returns the symbol that the transition reads.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the state that the transition leads to.
    pub fn target(&self) -> &State {
        &self.target
    }

    /// Returns true if and only if the transition is labelled with ε.
    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_empty()
    }

    /// Destructures the transition into its components.
    pub fn into_tuple(self) -> (State, Symbol, State) {
        (self.source, self.symbol, self.target)
    }
}

impl<X, S, Y> From<(X, S, Y)> for Transition
where
    X: Into<State>,
    S: Into<Symbol>,
    Y: Into<State>,
{
    fn from((source, symbol, target): (X, S, Y)) -> Self {
        Self::new(source, symbol, target)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) -> {}", self.source, self.symbol, self.target)
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!(
            "({}, {}, {})",
            self.source.show(),
            self.symbol.show(),
            self.target.show()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Transition;
    use crate::{Show, State, Symbol};

    #[test]
    fn transition_ordering() {
        let mut transitions = vec![
            Transition::new("q1", "a", "q0"),
            Transition::new("q0", "b", "q0"),
            Transition::new("q0", "a", "q2"),
            Transition::new("q0", "a", "q1"),
            Transition::new("q0", "", "q3"),
        ];
        transitions.sort();
        assert_eq!(
            transitions,
            vec![
                Transition::new("q0", "", "q3"),
                Transition::new("q0", "a", "q1"),
                Transition::new("q0", "a", "q2"),
                Transition::new("q0", "b", "q0"),
                Transition::new("q1", "a", "q0"),
            ]
        );
    }

    #[test]
    fn transition_components() {
        let t = Transition::from(("q0", " ", "q1"));
        assert!(t.is_epsilon());
        assert_eq!(t.source(), &State::of("q0"));
        assert_eq!(t.symbol(), &Symbol::EPSILON);
        assert_eq!(t.show(), "(q0, ε, q1)");
        assert_eq!(Transition::new("q0", "a", "q1").to_string(), "q0 (a) -> q1");
        assert_eq!(
            t.into_tuple(),
            (State::of("q0"), Symbol::EPSILON, State::of("q1"))
        );
    }
}
