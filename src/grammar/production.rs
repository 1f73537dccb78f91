use std::{cmp::Ordering, fmt::Display};

use itertools::Itertools;

use super::GrammarError;
use crate::Symbol;

/// A production rule `head -> body` of a context-free grammar, where `head` is a single
/// non-terminal and `body` is a (possibly empty) sequence of symbols. A rule with an empty body
/// is an ε-rule, which is written as `S -> ε`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ProductionRule {
    head: Symbol,
    body: Vec<Symbol>,
}

impl ProductionRule {
    /// Creates a new production rule from its head and body.
    pub fn new<S, I>(head: S, body: I) -> Self
    where
        S: Into<Symbol>,
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        Self {
            head: head.into(),
            body: body.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an ε-rule `head -> ε`.
    pub fn epsilon<S: Into<Symbol>>(head: S) -> Self {
        Self {
            head: head.into(),
            body: vec![],
        }
    }

    /// Parses a line like `S -> A,B | a | ε`, which produces one rule for each alternative.
    /// Alternatives are separated by `|` and the symbols of an alternative by `,`. The head
    /// must consist of alphanumeric characters and underscores only.
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let rules = ProductionRule::parse("A -> a,S | ε").unwrap();
    /// assert_eq!(
    ///     rules,
    ///     vec![ProductionRule::new("A", ["a", "S"]), ProductionRule::epsilon("A")]
    /// );
    /// ```
    pub fn parse(expression: &str) -> Result<Vec<ProductionRule>, GrammarError> {
        let expression = expression.trim();
        let (head, alternatives) = expression
            .split_once("->")
            .ok_or_else(|| GrammarError::MissingArrow(expression.to_string()))?;

        let head = head.trim();
        if head.is_empty() || !head.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(GrammarError::InvalidHead(expression.to_string()));
        }

        alternatives
            .split('|')
            .map(|alternative| {
                let alternative = alternative.trim();
                if alternative.is_empty() {
                    return Err(GrammarError::EmptyAlternative(expression.to_string()));
                }
                if alternative == "ε" {
                    return Ok(ProductionRule::epsilon(head));
                }
                let body: Vec<Symbol> = alternative.split(',').map(Symbol::of).collect();
                if body.iter().any(Symbol::is_empty) {
                    return Err(GrammarError::EmptySymbol(expression.to_string()));
                }
                Ok(ProductionRule::new(head, body))
            })
            .collect()
    }

    /// Returns the non-terminal on the left-hand side of the rule.
    pub fn head(&self) -> &Symbol {
        &self.head
    }

    /// Returns the sequence of symbols that the rule produces.
    pub fn body(&self) -> &[Symbol] {
        &self.body
    }

    /// Returns true if this is an ε-rule, i.e. if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Gives the body in the notation used by [`ProductionRule::parse`], `ε` for an ε-rule.
    pub fn body_string(&self) -> String {
        if self.body.is_empty() {
            "ε".to_string()
        } else {
            self.body.iter().map(Symbol::identifier).join(",")
        }
    }
}

/// Rules are ordered by their head, then rules with longer bodies come first and finally the
/// bodies are compared lexicographically.
impl Ord for ProductionRule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.head
            .cmp(&other.head)
            .then_with(|| other.body.len().cmp(&self.body.len()))
            .then_with(|| self.body.cmp(&other.body))
    }
}

impl PartialOrd for ProductionRule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ProductionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.head, self.body_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ProductionRule;
    use crate::{grammar::GrammarError, Symbol};

    #[test]
    fn parse_alternatives() {
        let rules = ProductionRule::parse("S -> A, B | b,S | ε").unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].head(), &Symbol::of("S"));
        assert_eq!(rules[0].body(), &[Symbol::of("A"), Symbol::of("B")]);
        assert_eq!(rules[1], ProductionRule::new("S", ["b", "S"]));
        assert!(rules[2].is_empty());
        assert_eq!(rules[2].to_string(), "S -> ε");
        assert_eq!(rules[0].to_string(), "S -> A,B");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            ProductionRule::parse("S A,B"),
            Err(GrammarError::MissingArrow("S A,B".to_string()))
        );
        assert_eq!(
            ProductionRule::parse(" -> a"),
            Err(GrammarError::InvalidHead("-> a".to_string()))
        );
        assert_eq!(
            ProductionRule::parse("S T -> a"),
            Err(GrammarError::InvalidHead("S T -> a".to_string()))
        );
        assert_eq!(
            ProductionRule::parse("S -> a ||b"),
            Err(GrammarError::EmptyAlternative("S -> a ||b".to_string()))
        );
        assert_eq!(
            ProductionRule::parse("S -> a,,b"),
            Err(GrammarError::EmptySymbol("S -> a,,b".to_string()))
        );
    }

    #[test]
    fn rule_ordering() {
        let mut rules = vec![
            ProductionRule::epsilon("A"),
            ProductionRule::new("B", ["b"]),
            ProductionRule::new("A", ["a"]),
            ProductionRule::new("A", ["a", "S"]),
        ];
        rules.sort();
        assert_eq!(
            rules,
            vec![
                ProductionRule::new("A", ["a", "S"]),
                ProductionRule::new("A", ["a"]),
                ProductionRule::epsilon("A"),
                ProductionRule::new("B", ["b"]),
            ]
        );
    }
}
