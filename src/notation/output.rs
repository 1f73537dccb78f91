use std::fmt::{Result, Write};

use itertools::Itertools;

use crate::automaton::Automaton;

/// Writes `automaton` in the textual notation. States are written in sorted order, one per
/// line, and are prefixed with `-> ` if they are the start state (`->* ` if the start state
/// is also final), with ` * ` if they are final and with three spaces otherwise. The outgoing
/// transitions of a state follow in sorted order after ` : `, separated by `, `.
///
/// Names are written as they are, the notation has no escapes. The output therefore only
/// parses back if no symbol contains `"` and no state name contains `"` or whitespace
/// outside of braces. Every automaton produced by [`parse_automaton`](super::parse_automaton)
/// or by [`Automaton::determinize`] on such an automaton satisfies this.
pub fn write_automaton<W: Write>(automaton: &Automaton, w: &mut W) -> Result {
    for state in automaton.states().iter().sorted() {
        let prefix = match (
            state == automaton.start_state(),
            automaton.is_final(state),
        ) {
            (true, true) => "->* ",
            (true, false) => "-> ",
            (false, true) => " * ",
            (false, false) => "   ",
        };
        w.write_str(prefix)?;
        w.write_str(state.name())?;

        let transitions = automaton.transitions_from(state);
        if !transitions.is_empty() {
            w.write_str(" : ")?;
            w.write_str(
                &transitions
                    .iter()
                    .map(|t| format!("\"{}\" -> {}", t.symbol(), t.target()))
                    .join(", "),
            )?;
        }
        w.write_char('\n')?;
    }
    Ok(())
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result {
        write_automaton(self, f)
    }
}
