use std::fmt::Display;

use crate::Show;

/// A symbol is a label that is used on the transitions of an automaton and in the
/// production rules of a grammar. It is identified by a string, from which surrounding
/// whitespace is removed upon construction. Two symbols are equal if and only if their
/// identifiers are equal, and symbols are ordered lexicographically by identifier.
///
/// The symbol with the empty identifier is special, it is the empty word ε. On a transition
/// it represents a move that consumes no input. See [`Symbol::EPSILON`].
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Symbol(String);

impl Symbol {
    /// The empty symbol ε.
    pub const EPSILON: Symbol = Symbol(String::new());

    /// Creates a new symbol from the given identifier, trimming any surrounding whitespace.
    /// ```
    /// use grammar_tool::Symbol;
    ///
    /// assert_eq!(Symbol::of(" a "), Symbol::of("a"));
    /// assert!(Symbol::of("  ").is_empty());
    /// ```
    pub fn of<S: AsRef<str>>(identifier: S) -> Self {
        Self(identifier.as_ref().trim().to_string())
    }

    /// Returns true if and only if `self` is the empty symbol ε.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gives the (trimmed) identifier of the symbol.
    pub fn identifier(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Self::of(value.to_string())
    }
}

impl From<&Symbol> for Symbol {
    fn from(value: &Symbol) -> Self {
        value.clone()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Show for Symbol {
    fn show(&self) -> String {
        if self.is_empty() {
            "ε".to_string()
        } else {
            self.0.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;
    use crate::Show;

    #[test]
    fn epsilon_identity() {
        assert!(Symbol::of("").is_empty());
        assert!(Symbol::EPSILON.is_empty());
        assert_eq!(Symbol::of(""), Symbol::EPSILON);
        assert_eq!(Symbol::of(" \t "), Symbol::EPSILON);
        assert_eq!(Symbol::default(), Symbol::EPSILON);
        assert_eq!(Symbol::EPSILON.show(), "ε");
        assert_eq!(Symbol::EPSILON.to_string(), "");
    }

    #[test]
    fn symbols_are_trimmed_values() {
        let a = Symbol::of("  abc\n");
        assert_eq!(a.identifier(), "abc");
        assert_eq!(a, Symbol::from("abc"));
        assert!(!a.is_empty());
        assert_eq!(Symbol::from('x'), Symbol::of("x"));
    }

    #[test]
    fn symbols_ordered_lexicographically() {
        let mut symbols = vec![Symbol::of("b"), Symbol::of("ab"), Symbol::EPSILON, Symbol::of("a")];
        symbols.sort();
        assert_eq!(
            symbols,
            vec![Symbol::EPSILON, Symbol::of("a"), Symbol::of("ab"), Symbol::of("b")]
        );
    }
}
