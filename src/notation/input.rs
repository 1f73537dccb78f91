use std::str::FromStr;

use tracing::trace;

use super::FormatError;
use crate::{automaton::Automaton, math::Set, State, Symbol, Transition};

/// The modifier that precedes the name of a state on a line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Modifier {
    start: bool,
    accepting: bool,
}

const MODIFIERS: [(&str, Modifier); 4] = [
    ("->*", Modifier { start: true, accepting: true }),
    ("*->", Modifier { start: true, accepting: true }),
    ("->", Modifier { start: true, accepting: false }),
    ("*", Modifier { start: false, accepting: true }),
];

/// Parses an [`Automaton`] from its textual notation, see the [module level
/// documentation](crate::notation) for a description of the format.
///
/// Every state that is named, either at the beginning of a line or as the target of a
/// transition, belongs to the automaton. The alphabet consists of the symbols that appear on
/// transitions. Errors point to the (1-based) line on which they occur, if the description
/// is well-formed but does not make up a valid automaton, [`FormatError::Invalid`] is returned.
/// ```
/// use grammar_tool::{notation::parse_automaton, prelude::*};
///
/// let aut = parse_automaton("-> q0 : \"a\" -> q1\n * q1").unwrap();
/// assert_eq!(aut.state_count(), 2);
/// assert!(matches!(
///     parse_automaton("-> q0 : a -> q1\n * q1"),
///     Err(FormatError::UnquotedSymbol { line: 1, .. })
/// ));
/// ```
pub fn parse_automaton(input: &str) -> Result<Automaton, FormatError> {
    let mut start_state: Option<State> = None;
    let mut states = Set::default();
    let mut final_states = Set::default();
    let mut transitions = Set::default();

    for (index, content) in input.lines().enumerate() {
        let line = index + 1;
        if content.trim().is_empty() {
            continue;
        }

        let (definition, body) = match split_once_top_level(content, |c| c == ':') {
            Some((definition, body)) => (definition, Some(body)),
            None => (content, None),
        };
        let (modifier, state) = parse_definition(line, definition)?;

        if modifier.start {
            if let Some(first) = start_state {
                return Err(FormatError::MultipleStartStates {
                    line,
                    first,
                    second: state,
                });
            }
            start_state = Some(state.clone());
        }
        if modifier.accepting {
            final_states.insert(state.clone());
        }

        if let Some(body) = body.filter(|body| !body.trim().is_empty()) {
            for segment in split_top_level(body, |c| c == ',') {
                let transition = parse_transition(line, &state, segment)?;
                states.insert(transition.target().clone());
                transitions.insert(transition);
            }
        }
        states.insert(state);
    }

    let start_state = start_state.ok_or(FormatError::MissingStartState)?;
    let alphabet: Set<Symbol> = transitions.iter().map(|t| t.symbol().clone()).collect();
    trace!(
        "parsed {} states and {} transitions starting in {}",
        states.len(),
        transitions.len(),
        start_state
    );

    Ok(Automaton::new(
        alphabet,
        states,
        final_states,
        start_state,
        transitions,
    )?)
}

impl FromStr for Automaton {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_automaton(s)
    }
}

impl TryFrom<&str> for Automaton {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse_automaton(value)
    }
}

/// Parses the part of a line that precedes the colon, i.e. the optional modifier followed by
/// the name of the state.
fn parse_definition(line: usize, definition: &str) -> Result<(Modifier, State), FormatError> {
    let definition = definition.trim();

    let (modifier, name) = match split_once_top_level(definition, char::is_whitespace) {
        Some((first, rest)) => {
            let Some((_, modifier)) = MODIFIERS.iter().find(|(m, _)| *m == first) else {
                return Err(FormatError::UnknownModifier {
                    line,
                    modifier: first.to_string(),
                });
            };
            (*modifier, rest.trim())
        }
        // the modifier may be glued to the name, as in `*q1`
        None => match MODIFIERS.iter().find(|(m, _)| definition.starts_with(m)) {
            Some((m, modifier)) => (*modifier, &definition[m.len()..]),
            None => (Modifier::default(), definition),
        },
    };

    Ok((modifier, parse_state_name(line, name)?))
}

/// Parses a single `"symbol" -> target` entry of the transition list of `source`.
fn parse_transition(line: usize, source: &State, segment: &str) -> Result<Transition, FormatError> {
    let segment = segment.trim();

    let (symbol, rest) = segment
        .strip_prefix('"')
        .and_then(|quoted| quoted.split_once('"'))
        .ok_or_else(|| FormatError::UnquotedSymbol {
            line,
            segment: segment.to_string(),
        })?;

    let target = rest
        .trim_start()
        .strip_prefix("->")
        .ok_or_else(|| FormatError::MissingArrow {
            line,
            segment: segment.to_string(),
        })?;
    if target.trim().is_empty() {
        return Err(FormatError::MissingTarget {
            line,
            segment: segment.to_string(),
        });
    }

    Ok(Transition::new(
        source,
        Symbol::of(symbol),
        parse_state_name(line, target)?,
    ))
}

/// A state name may not contain quotes and may only contain whitespace within braces.
fn parse_state_name(line: usize, name: &str) -> Result<State, FormatError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormatError::MissingStateName { line });
    }
    if name.contains('"') || split_once_top_level(name, char::is_whitespace).is_some() {
        return Err(FormatError::InvalidStateName {
            line,
            name: name.to_string(),
        });
    }
    Ok(State::of(name))
}

/// Returns the byte positions of all characters in `s` that match `separator` and are neither
/// enclosed in quotes nor in braces.
fn top_level_positions<F>(s: &str, separator: F) -> impl Iterator<Item = usize> + '_
where
    F: Fn(char) -> bool + 'static,
{
    let mut quoted = false;
    let mut depth = 0usize;
    s.char_indices().filter_map(move |(position, c)| {
        match c {
            '"' => quoted = !quoted,
            '{' if !quoted => depth += 1,
            '}' if !quoted => depth = depth.saturating_sub(1),
            c if !quoted && depth == 0 && separator(c) => return Some(position),
            _ => {}
        }
        None
    })
}

fn split_once_top_level<F>(s: &str, separator: F) -> Option<(&str, &str)>
where
    F: Fn(char) -> bool + 'static,
{
    let position = top_level_positions(s, separator).next()?;
    let width = s[position..].chars().next().map_or(1, char::len_utf8);
    Some((&s[..position], &s[position + width..]))
}

fn split_top_level<F>(s: &str, separator: F) -> Vec<&str>
where
    F: Fn(char) -> bool + 'static,
{
    let mut parts = Vec::new();
    let mut last = 0;
    for position in top_level_positions(s, separator) {
        parts.push(&s[last..position]);
        last = position + s[position..].chars().next().map_or(1, char::len_utf8);
    }
    parts.push(&s[last..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::{split_top_level, FormatError};
    use crate::prelude::*;

    #[test]
    fn parse_single_transition() {
        let parsed: Automaton = "-> q0 : \"a\" -> q1\n * q1\n".parse().unwrap();
        let expected = Automaton::from_transitions(
            State::of("q0"),
            [Transition::new("q0", "a", "q1")],
            [State::of("q1")],
        )
        .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_with_epsilon() {
        let parsed: Automaton = r#"
            -> q0 : "a" -> q1, "b" -> q2
               q1 : "a" -> q0, "" -> q2
             * q2 : "c" -> q2
        "#
        .parse()
        .unwrap();
        let expected = Automaton::from_transitions(
            State::of("q0"),
            [
                Transition::new("q0", "a", "q1"),
                Transition::new("q0", "b", "q2"),
                Transition::new("q1", "a", "q0"),
                Transition::new("q1", Symbol::EPSILON, "q2"),
                Transition::new("q2", "c", "q2"),
            ],
            [State::of("q2")],
        )
        .unwrap();
        assert_eq!(parsed, expected);
        assert!(parsed.alphabet().contains(&Symbol::EPSILON));
    }

    #[test]
    fn whitespace_is_insignificant() {
        let compact: Automaton = "->q0:\"a\"->q1,\"b\"->q0\n*q1".parse().unwrap();
        let spaced: Automaton = "\n\n  ->   q0  :  \" a \"  ->  q1 ,  \"b\"->q0  \n\n\t*  q1 \r\n"
            .parse()
            .unwrap();
        assert_eq!(compact, spaced);
    }

    #[test]
    fn declared_states_without_transitions_are_kept() {
        let aut: Automaton = "-> q0 : \"a\" -> q1\n * q1\n   q2\n * q3".parse().unwrap();
        assert_eq!(aut.state_count(), 4);
        assert!(aut.is_final(&State::of("q3")));
        assert!(!aut.is_final(&State::of("q2")));
    }

    #[test]
    fn start_state_may_be_final() {
        for description in ["->* q0 : \"a\" -> q0", "*-> q0 : \"a\" -> q0", "->*q0"] {
            let aut: Automaton = description.parse().unwrap();
            assert_eq!(aut.start_state(), &State::of("q0"));
            assert!(aut.is_final(&State::of("q0")));
        }
    }

    #[test]
    fn merged_state_names() {
        let aut: Automaton = r#"
            -> {q0, q1} : "a" -> {q1, q2}, "b" -> q0
             * {q1, q2}
               q0 : ":" -> {q0, q1}, "," -> q0
        "#
        .parse()
        .unwrap();
        assert_eq!(aut.state_count(), 3);
        assert_eq!(aut.start_state(), &State::of("{q0, q1}"));
        assert!(aut.transitions().contains(&Transition::new("{q0, q1}", "a", "{q1, q2}")));
        assert!(aut.transitions().contains(&Transition::new("q0", ":", "{q0, q1}")));
        assert!(aut.transitions().contains(&Transition::new("q0", ",", "q0")));
    }

    #[test]
    fn format_errors() {
        let parse = |s: &str| s.parse::<Automaton>().unwrap_err();

        assert_eq!(
            parse("-> q0 : \"a\" -> q1\n + q1"),
            FormatError::UnknownModifier {
                line: 2,
                modifier: "+".to_string()
            }
        );
        assert_eq!(
            parse("->\n * q1"),
            FormatError::MissingStateName { line: 1 }
        );
        assert_eq!(
            parse("-> q0 : a -> q1\n * q1"),
            FormatError::UnquotedSymbol {
                line: 1,
                segment: "a -> q1".to_string()
            }
        );
        assert_eq!(
            parse("-> q0 : \"a -> q1\n * q1"),
            FormatError::UnquotedSymbol {
                line: 1,
                segment: "\"a -> q1".to_string()
            }
        );
        assert_eq!(
            parse("-> q0 : \"a\" q1\n * q1"),
            FormatError::MissingArrow {
                line: 1,
                segment: "\"a\" q1".to_string()
            }
        );
        assert_eq!(
            parse("-> q0 : \"a\" -> \n * q1"),
            FormatError::MissingTarget {
                line: 1,
                segment: "\"a\" ->".to_string()
            }
        );
        assert_eq!(
            parse("-> q0 : \"a\" -> q1 q2\n * q1"),
            FormatError::InvalidStateName {
                line: 1,
                name: "q1 q2".to_string()
            }
        );
        assert_eq!(
            parse("-> q0 : \"a\" -> q1,\n * q1"),
            FormatError::UnquotedSymbol {
                line: 1,
                segment: String::new()
            }
        );
    }

    #[test]
    fn start_state_errors() {
        assert_eq!(
            "q0 : \"a\" -> q1\n * q1".parse::<Automaton>().unwrap_err(),
            FormatError::MissingStartState
        );
        assert_eq!(
            "-> q0 : \"a\" -> q1\n\n-> q1".parse::<Automaton>().unwrap_err(),
            FormatError::MultipleStartStates {
                line: 3,
                first: State::of("q0"),
                second: State::of("q1")
            }
        );
    }

    #[test]
    fn invalid_automaton() {
        assert_eq!(
            "-> q0 : \"a\" -> q1".parse::<Automaton>().unwrap_err(),
            FormatError::Invalid(InvalidAutomatonError::NoFinalStates)
        );
        assert!(Automaton::try_from("").is_err());
    }

    #[test]
    fn top_level_splitting() {
        assert_eq!(
            split_top_level(r#""a" -> {x, y}, "," -> z"#, |c| c == ','),
            vec![r#""a" -> {x, y}"#, r#" "," -> z"#]
        );
        assert_eq!(split_top_level("abc", |c| c == ','), vec!["abc"]);
    }
}
