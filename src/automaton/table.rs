use itertools::Itertools;

use super::Automaton;
use crate::{Show, State};

impl Automaton {
    /// Returns a string representation of the transition table of the automaton. There is a
    /// row for each state and a column for each symbol of the alphabet (ε included, if it is
    /// present), both in sorted order. The start state is marked with `->` and final states
    /// are marked with `*`. A cell contains the state that is reached, or the merged state if
    /// several states are reached, and `-` if there is no transition.
    pub fn transition_table(&self) -> String {
        let symbols = self.alphabet().iter().sorted().collect_vec();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(symbols.iter().map(|s| s.show())),
        );
        for state in self.states().iter().sorted() {
            let mut row = vec![self.decorate(state)];
            for &symbol in &symbols {
                let reached = self.next_states(state, symbol);
                row.push(match State::try_merge(&reached) {
                    Some(target) => target.show(),
                    None => "-".to_string(),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    fn decorate(&self, state: &State) -> String {
        let marker = match (state == self.start_state(), self.is_final(state)) {
            (true, true) => "->* ",
            (true, false) => "-> ",
            (false, true) => "* ",
            (false, false) => "",
        };
        format!("{marker}{}", state.show())
    }
}
