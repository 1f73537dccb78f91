//! A line-based textual notation for automata. Each line describes a single state:
//! ```text
//! [modifier] name [: "symbol" -> target, "symbol" -> target, ...]
//! ```
//! The modifier `->` marks the start state, of which there must be exactly one, `*` marks a
//! final state and `->*` (or `*->`) marks a start state that is also final. States without a
//! modifier are neither. The transitions of a state are given after a colon, each one as a
//! quoted symbol followed by `->` and the name of the target state. The empty symbol `""`
//! stands for an epsilon transition. Blank lines and whitespace around tokens are ignored, and
//! separators that occur within quotes or braces (as in merged states like `{q0, q1}`) are not
//! treated as separators.
//! ```text
//! -> q0 : "a" -> q1, "" -> q2
//!    q1 : "b" -> q2, "c" -> q3
//!  * q2 : "c" -> q3
//!  * q3
//! ```
//! Printing an automaton (through its [`Display`](std::fmt::Display) implementation or
//! [`write_automaton`]) sorts states and transitions, so the output is canonical.

use thiserror::Error;

use crate::automaton::{InvalidAutomatonError, State};

/// Parsing of the notation.
pub mod input;
pub use input::parse_automaton;

/// Printing of the notation.
pub mod output;
pub use output::write_automaton;

/// Abstracts the types of errors that can occur when parsing an automaton from its textual
/// notation. Line numbers start at 1.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum FormatError {
    #[error("line {line}: unknown state modifier `{modifier}`")]
    UnknownModifier { line: usize, modifier: String },
    #[error("line {line}: missing state name")]
    MissingStateName { line: usize },
    #[error("line {line}: `{name}` is not a valid state name")]
    InvalidStateName { line: usize, name: String },
    #[error("line {line}: transition `{segment}` does not start with a quoted symbol")]
    UnquotedSymbol { line: usize, segment: String },
    #[error("line {line}: transition `{segment}` is missing the `->` separator")]
    MissingArrow { line: usize, segment: String },
    #[error("line {line}: transition `{segment}` has no target state")]
    MissingTarget { line: usize, segment: String },
    #[error("line {line}: `{second}` is marked as start state, but `{first}` already is")]
    MultipleStartStates {
        line: usize,
        first: State,
        second: State,
    },
    #[error("no state is marked as start state")]
    MissingStartState,
    #[error("description does not form a valid automaton: {0}")]
    Invalid(#[from] InvalidAutomatonError),
}
