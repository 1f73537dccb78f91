use std::{collections::BTreeMap, fmt::Display};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{math::Set, Show, Symbol};

mod production;
pub use production::ProductionRule;

/// Represents the things that can go wrong when reading production rules or when assembling
/// a [`ContextFreeGrammar`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GrammarError {
    /// A production rule lacks the `->` that separates head and body.
    #[error("production rule `{0}` is missing the `->` separator")]
    MissingArrow(String),
    /// The head of a production rule is missing or is not a single word.
    #[error("production rule `{0}` must start with a single non-terminal")]
    InvalidHead(String),
    /// One of the `|`-separated alternatives of a production rule is empty.
    #[error("production rule `{0}` contains an empty alternative, use `ε` instead")]
    EmptyAlternative(String),
    /// The body of a production rule contains an empty symbol.
    #[error("production rule `{0}` contains an empty symbol")]
    EmptySymbol(String),
    /// The start symbol is not a non-terminal.
    #[error("start symbol `{0}` is not an element of the non-terminals")]
    StartNotNonTerminal(Symbol),
    /// Some symbols are terminal and non-terminal at the same time.
    #[error("terminal and non-terminal symbols overlap: {}", .0.iter().join(", "))]
    Overlap(Vec<Symbol>),
    /// A production rule does not begin with a non-terminal.
    #[error("production rule `{0}` must begin with a non-terminal")]
    HeadNotNonTerminal(ProductionRule),
    /// A production rule produces a symbol that is neither terminal nor non-terminal.
    #[error("production rule `{rule}` produces `{symbol}`, which is neither terminal nor non-terminal")]
    #[allow(missing_docs)]
    UnknownSymbol { rule: ProductionRule, symbol: Symbol },
    /// The start symbol does not derive any word consisting of terminals only.
    #[error("the start symbol does not derive any terminal word")]
    EmptyLanguage,
}

/// A context-free grammar, consisting of disjoint sets of non-terminal and terminal symbols, a
/// set of [`ProductionRule`]s and a designated start symbol. Just like an
/// [`Automaton`](crate::Automaton), a grammar is validated upon construction and transformations
/// produce a new grammar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContextFreeGrammar {
    non_terminals: Set<Symbol>,
    terminals: Set<Symbol>,
    rules: Set<ProductionRule>,
    start: Symbol,
}

impl ContextFreeGrammar {
    /// Creates a new grammar and verifies that
    /// 1. the start symbol is a non-terminal,
    /// 2. no symbol is both terminal and non-terminal,
    /// 3. every rule begins with a non-terminal and
    /// 4. every rule produces only terminals and non-terminals.
    ///
    /// The first violated condition is reported as a [`GrammarError`].
    pub fn new<N, T, R>(
        non_terminals: N,
        terminals: T,
        rules: R,
        start: Symbol,
    ) -> Result<Self, GrammarError>
    where
        N: IntoIterator<Item = Symbol>,
        T: IntoIterator<Item = Symbol>,
        R: IntoIterator<Item = ProductionRule>,
    {
        let non_terminals: Set<Symbol> = non_terminals.into_iter().collect();
        let terminals: Set<Symbol> = terminals.into_iter().collect();
        let rules: Set<ProductionRule> = rules.into_iter().collect();

        if !non_terminals.contains(&start) {
            return Err(GrammarError::StartNotNonTerminal(start));
        }

        let overlap = terminals
            .iter()
            .filter(|s| non_terminals.contains(*s))
            .sorted()
            .cloned()
            .collect_vec();
        if !overlap.is_empty() {
            return Err(GrammarError::Overlap(overlap));
        }

        for rule in rules.iter().sorted() {
            if !non_terminals.contains(rule.head()) {
                return Err(GrammarError::HeadNotNonTerminal(rule.clone()));
            }
            if let Some(symbol) = rule
                .body()
                .iter()
                .find(|s| !non_terminals.contains(*s) && !terminals.contains(*s))
            {
                return Err(GrammarError::UnknownSymbol {
                    rule: rule.clone(),
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(Self {
            non_terminals,
            terminals,
            rules,
            start,
        })
    }

    /// Builds a grammar from comma-separated lists of non-terminals and terminals together with
    /// production rules in the notation of [`ProductionRule::parse`].
    /// ```
    /// use grammar_tool::prelude::*;
    ///
    /// let grammar = ContextFreeGrammar::from_production_rules(
    ///     "S",
    ///     "S, A, B",
    ///     "a, b",
    ///     ["S -> A,B", "A -> a,S | ε", "B -> b,B | ε"],
    /// )
    /// .unwrap();
    /// assert_eq!(grammar.rules().len(), 5);
    /// assert!(grammar.is_recursive(&Symbol::of("S")));
    /// ```
    pub fn from_production_rules<'a, I>(
        start: &str,
        non_terminals: &str,
        terminals: &str,
        rules: I,
    ) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parsed = Vec::new();
        for expression in rules {
            parsed.extend(ProductionRule::parse(expression)?);
        }
        Self::new(
            symbol_list(non_terminals),
            symbol_list(terminals),
            parsed,
            Symbol::of(start),
        )
    }

    /// Returns the set of non-terminal symbols.
    pub fn non_terminals(&self) -> &Set<Symbol> {
        &self.non_terminals
    }

    /// Returns the set of terminal symbols.
    pub fn terminals(&self) -> &Set<Symbol> {
        &self.terminals
    }

    /// Returns the set of production rules.
    pub fn rules(&self) -> &Set<ProductionRule> {
        &self.rules
    }

    /// Returns the start symbol.
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// Returns true if `symbol` is a terminal.
    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        self.terminals.contains(symbol)
    }

    /// Returns true if `symbol` is a non-terminal.
    pub fn is_non_terminal(&self, symbol: &Symbol) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// Returns all rules whose head is `symbol`, in sorted order.
    pub fn rules_for(&self, symbol: &Symbol) -> Vec<&ProductionRule> {
        self.rules
            .iter()
            .filter(|rule| rule.head() == symbol)
            .sorted()
            .collect()
    }

    /// Returns true if `symbol` is a non-terminal which can derive, in one or more steps, a
    /// sequence of symbols that contains `symbol` itself.
    pub fn is_recursive(&self, symbol: &Symbol) -> bool {
        if !self.is_non_terminal(symbol) {
            return false;
        }

        let mut reached: Set<&Symbol> = Set::default();
        let mut queue = vec![symbol];
        while let Some(current) = queue.pop() {
            for rule in self.rules.iter().filter(|rule| rule.head() == current) {
                for produced in rule.body() {
                    if produced == symbol {
                        trace!("{} is recursive through {}", symbol.show(), rule);
                        return true;
                    }
                    if self.is_non_terminal(produced) && reached.insert(produced) {
                        queue.push(produced);
                    }
                }
            }
        }
        false
    }

    /// Computes the set of non-terminals that can derive the empty word.
    pub fn nullable_symbols(&self) -> Set<Symbol> {
        self.saturate(Set::default())
    }

    /// Computes the set of productive symbols, which are those that derive at least one word
    /// consisting only of terminals. Every terminal is productive.
    pub fn productive_symbols(&self) -> Set<Symbol> {
        self.saturate(self.terminals.clone())
    }

    /// Least superset of `known` that contains the head of every rule whose body consists
    /// only of symbols in the set.
    fn saturate(&self, mut known: Set<Symbol>) -> Set<Symbol> {
        loop {
            let discovered = self
                .rules
                .iter()
                .filter(|rule| !known.contains(rule.head()))
                .filter(|rule| rule.body().iter().all(|s| known.contains(s)))
                .map(|rule| rule.head().clone())
                .collect_vec();
            if discovered.is_empty() {
                return known;
            }
            known.extend(discovered);
        }
    }

    /// Computes the set of symbols, terminal or not, that occur in some sequence derived from
    /// the start symbol. The start symbol itself is always reachable.
    pub fn reachable_symbols(&self) -> Set<Symbol> {
        let mut reached: Set<Symbol> = Set::default();
        reached.insert(self.start.clone());
        let mut queue = vec![&self.start];
        while let Some(current) = queue.pop() {
            for rule in self.rules.iter().filter(|rule| rule.head() == current) {
                for produced in rule.body() {
                    if reached.insert(produced.clone()) {
                        queue.push(produced);
                    }
                }
            }
        }
        reached
    }

    /// Computes an equivalent grammar in productive form, which means every non-terminal that
    /// does not derive a terminal word is removed together with all rules that mention it.
    /// Fails with [`GrammarError::EmptyLanguage`] if the start symbol itself is not productive.
    pub fn to_productive_form(&self) -> Result<ContextFreeGrammar, GrammarError> {
        let productive = self.productive_symbols();
        if !productive.contains(&self.start) {
            return Err(GrammarError::EmptyLanguage);
        }

        let non_terminals = self
            .non_terminals
            .iter()
            .filter(|s| productive.contains(*s))
            .cloned()
            .collect_vec();
        debug!(
            "removing {} non-productive non-terminals",
            self.non_terminals.len() - non_terminals.len()
        );
        let rules = self
            .rules
            .iter()
            .filter(|rule| productive.contains(rule.head()))
            .filter(|rule| rule.body().iter().all(|s| productive.contains(s)))
            .cloned()
            .collect_vec();

        Self::new(
            non_terminals,
            self.terminals.iter().cloned(),
            rules,
            self.start.clone(),
        )
    }

    /// Computes the productive form (see [`ContextFreeGrammar::to_productive_form`]) and then
    /// additionally removes all non-terminals that are not reachable from the start symbol,
    /// together with their rules. Terminals are kept.
    pub fn to_reduced_form(&self) -> Result<ContextFreeGrammar, GrammarError> {
        let productive = self.to_productive_form()?;
        let reachable = productive.reachable_symbols();

        let non_terminals = productive
            .non_terminals
            .iter()
            .filter(|s| reachable.contains(*s))
            .cloned()
            .collect_vec();
        let rules = productive
            .rules
            .iter()
            .filter(|rule| reachable.contains(rule.head()))
            .cloned()
            .collect_vec();

        Self::new(
            non_terminals,
            productive.terminals.iter().cloned(),
            rules,
            productive.start.clone(),
        )
    }
}

fn symbol_list(list: &str) -> Vec<Symbol> {
    list.split(',')
        .map(Symbol::of)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Writes one line per non-terminal that has rules, starting with the start symbol, e.g.
/// `S -> A,B | ε`. Alternatives appear in the order of [`ProductionRule`]s.
impl Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut by_head: BTreeMap<&Symbol, Vec<&ProductionRule>> = BTreeMap::new();
        for rule in self.rules.iter().sorted() {
            by_head.entry(rule.head()).or_default().push(rule);
        }

        let start = by_head.remove_entry(&self.start);
        for (head, rules) in start.into_iter().chain(by_head) {
            writeln!(
                f,
                "{} -> {}",
                head,
                rules.iter().map(|rule| rule.body_string()).join(" | ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextFreeGrammar, GrammarError, ProductionRule};
    use crate::{math::Set, Symbol};

    fn symbols<const N: usize>(names: [&str; N]) -> Set<Symbol> {
        names.into_iter().map(Symbol::of).collect()
    }

    fn example() -> ContextFreeGrammar {
        ContextFreeGrammar::from_production_rules(
            "S",
            "S, A, B, C",
            "a, b, c",
            ["S -> A,B", "A -> a,S | ε", "B -> b,B | ε", "C -> c,C | ε"],
        )
        .unwrap()
    }

    #[test]
    fn validation() {
        let rule = ProductionRule::new("S", ["a"]);
        assert_eq!(
            ContextFreeGrammar::new(symbols(["S"]), symbols(["a"]), [rule.clone()], Symbol::of("T")),
            Err(GrammarError::StartNotNonTerminal(Symbol::of("T")))
        );
        assert_eq!(
            ContextFreeGrammar::new(
                symbols(["S", "b", "a"]),
                symbols(["a", "b", "c"]),
                [rule.clone()],
                Symbol::of("S")
            ),
            Err(GrammarError::Overlap(vec![Symbol::of("a"), Symbol::of("b")]))
        );
        let bad_head = ProductionRule::new("a", ["S"]);
        assert_eq!(
            ContextFreeGrammar::new(
                symbols(["S"]),
                symbols(["a"]),
                [rule.clone(), bad_head.clone()],
                Symbol::of("S")
            ),
            Err(GrammarError::HeadNotNonTerminal(bad_head))
        );
        let unknown = ProductionRule::new("S", ["a", "x"]);
        assert_eq!(
            ContextFreeGrammar::new(symbols(["S"]), symbols(["a"]), [unknown.clone()], Symbol::of("S")),
            Err(GrammarError::UnknownSymbol {
                rule: unknown,
                symbol: Symbol::of("x")
            })
        );
        assert!(
            ContextFreeGrammar::new(symbols(["S"]), symbols(["a"]), [rule], Symbol::of("S")).is_ok()
        );
    }

    #[test]
    fn parse_errors_are_propagated() {
        assert_eq!(
            ContextFreeGrammar::from_production_rules("S", "S", "a", ["S a"]),
            Err(GrammarError::MissingArrow("S a".to_string()))
        );
    }

    #[test]
    fn queries() {
        let g = example();
        assert!(g.is_terminal(&Symbol::of("a")));
        assert!(!g.is_terminal(&Symbol::of("A")));
        assert!(g.is_non_terminal(&Symbol::of("C")));
        assert_eq!(g.start(), &Symbol::of("S"));
        assert_eq!(
            g.rules_for(&Symbol::of("A")),
            vec![
                &ProductionRule::new("A", ["a", "S"]),
                &ProductionRule::epsilon("A")
            ]
        );
        assert!(g.rules_for(&Symbol::of("a")).is_empty());
    }

    #[test]
    fn recursion() {
        let g = example();
        assert!(g.is_recursive(&Symbol::of("S")), "S -> A,B -> a,S,B");
        assert!(g.is_recursive(&Symbol::of("A")));
        assert!(g.is_recursive(&Symbol::of("B")));
        assert!(g.is_recursive(&Symbol::of("C")));
        assert!(!g.is_recursive(&Symbol::of("a")));

        let flat = ContextFreeGrammar::from_production_rules(
            "S",
            "S, A",
            "a",
            ["S -> A,A", "A -> a"],
        )
        .unwrap();
        assert!(!flat.is_recursive(&Symbol::of("S")));
        assert!(!flat.is_recursive(&Symbol::of("A")));
    }

    #[test]
    fn nullable_and_productive() {
        let g = example();
        assert_eq!(g.nullable_symbols(), symbols(["S", "A", "B", "C"]));

        let g = ContextFreeGrammar::from_production_rules(
            "S",
            "S, A, B, D",
            "a, b",
            ["S -> A,B | a", "A -> a,A", "B -> b | ε", "D -> S"],
        )
        .unwrap();
        assert_eq!(g.nullable_symbols(), symbols(["B"]));
        assert_eq!(g.productive_symbols(), symbols(["a", "b", "S", "B", "D"]));
        assert_eq!(g.reachable_symbols(), symbols(["S", "A", "B", "a", "b"]));
    }

    #[test]
    fn productive_and_reduced_form() {
        let g = ContextFreeGrammar::from_production_rules(
            "S",
            "S, A, B, D",
            "a, b",
            ["S -> A,B | a", "A -> a,A", "B -> b | ε", "D -> S"],
        )
        .unwrap();

        let productive = g.to_productive_form().unwrap();
        assert_eq!(productive.non_terminals(), &symbols(["S", "B", "D"]));
        assert_eq!(productive.terminals(), g.terminals());
        assert_eq!(
            productive.rules().len(),
            4,
            "S -> a, B -> b, B -> ε and D -> S remain"
        );
        assert!(!productive
            .rules()
            .contains(&ProductionRule::new("S", ["A", "B"])));

        let reduced = g.to_reduced_form().unwrap();
        assert_eq!(reduced.non_terminals(), &symbols(["S"]));
        assert_eq!(reduced.to_string(), "S -> a\n");
    }

    #[test]
    fn empty_language() {
        let g = ContextFreeGrammar::from_production_rules("S", "S", "a", ["S -> a,S"]).unwrap();
        assert_eq!(g.to_productive_form(), Err(GrammarError::EmptyLanguage));
        assert_eq!(g.to_reduced_form(), Err(GrammarError::EmptyLanguage));
    }

    #[test]
    fn display() {
        assert_eq!(
            example().to_string(),
            "S -> A,B\nA -> a,S | ε\nB -> b,B | ε\nC -> c,C | ε\n"
        );
    }
}
