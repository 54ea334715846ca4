//! This module provides the decoder for machine codes, utilizing the `pest` crate.
//! The grammar only fixes the block layout; each write, move and jump character is validated
//! here so that a malformed code reports the state it was found in.

use crate::{
    analyzer::check_state_order,
    machine::{Machine, TransitionTable},
    types::{
        DecodeError, Direction, StateIndex, Symbol, Transition, DEFAULT_ALL_TAPE, HALT_LETTER,
        HALT_STATE, MAX_SYMBOLS,
    },
};
use pest::{
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;
use tracing::debug;

/// Derives a `PestParser` for the machine code grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineCodeParser;

/// A spec as written in the code, before its characters are given a meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawSpec {
    Undefined,
    Instruction { write: char, shift: char, jump: char },
}

/// Decodes a machine code over an alphabet of `symbols` symbols, with a blank tape of
/// `DEFAULT_ALL_TAPE`.
///
/// # Arguments
///
/// * `code` - The machine code, e.g. `1RB1LB_1LA1RZ`.
/// * `symbols` - The alphabet size `m`.
///
/// # Returns
///
/// * `Ok(Machine)` if the code is well formed.
/// * `Err(DecodeError)` describing the first violation found.
pub fn decode(code: &str, symbols: usize) -> Result<Machine, DecodeError> {
    decode_with_blank(code, symbols, DEFAULT_ALL_TAPE)
}

/// Decodes a machine code whose tape initially holds `all_tape` in every cell.
pub fn decode_with_blank(
    code: &str,
    symbols: usize,
    all_tape: Symbol,
) -> Result<Machine, DecodeError> {
    let code = code.trim();
    let table = parse_table(code, symbols)?;
    let machine = Machine::from_table(code, table, all_tape)?;

    debug!(
        code,
        states = machine.states(),
        symbols = machine.symbols(),
        "decoded machine"
    );

    Ok(machine)
}

/// Parses a machine code into a dense `n x m` transition table.
pub fn parse_table(code: &str, symbols: usize) -> Result<TransitionTable, DecodeError> {
    if symbols == 0 || symbols > MAX_SYMBOLS {
        return Err(DecodeError::AlphabetSize(symbols));
    }

    let pairs = MachineCodeParser::parse(Rule::machine_code, code.trim()).map_err(Box::new)?;
    let blocks = parse_blocks(pairs);

    // The naming scheme is checked once over the whole code, before any spec is interpreted.
    let jumps = blocks.iter().flatten().filter_map(|spec| match spec {
        RawSpec::Instruction { jump, .. } => Some(*jump),
        RawSpec::Undefined => None,
    });
    check_state_order(jumps, blocks.len())?;

    let mut transitions = Vec::with_capacity(blocks.len() * symbols);
    for (index, block) in blocks.iter().enumerate() {
        let state = index + 1;

        if block.len() != symbols {
            return Err(DecodeError::BlockWidth {
                state,
                found: block.len(),
                expected: symbols,
            });
        }

        for spec in block {
            transitions.push(parse_spec(*spec, state, symbols)?);
        }
    }

    Ok(TransitionTable::new(symbols, transitions))
}

/// Collects the raw specs of every state block, in declaration order.
fn parse_blocks(pairs: Pairs<Rule>) -> Vec<Vec<RawSpec>> {
    let mut blocks = Vec::new();

    // Rule: machine_code > [state] > [undefined | instruction]
    for root in pairs {
        for block in root.into_inner() {
            if block.as_rule() == Rule::state {
                blocks.push(block.into_inner().filter_map(parse_raw_spec).collect());
            }
        }
    }

    blocks
}

/// Converts a `Pair<Rule::undefined>` or `Pair<Rule::instruction>` into a `RawSpec`.
fn parse_raw_spec(pair: Pair<Rule>) -> Option<RawSpec> {
    match pair.as_rule() {
        Rule::undefined => Some(RawSpec::Undefined),
        Rule::instruction => {
            let mut inner = pair.into_inner();
            let write = parse_cell(inner.next());
            let shift = parse_cell(inner.next());
            let jump = parse_cell(inner.next());
            Some(RawSpec::Instruction { write, shift, jump })
        }
        _ => None,
    }
}

/// Extracts the single character held by a `write`, `shift` or `jump` pair.
fn parse_cell(pair: Option<Pair<Rule>>) -> char {
    pair.and_then(|p| p.as_str().chars().next()).unwrap_or_default()
}

/// Gives meaning to a raw spec found in `state`.
fn parse_spec(spec: RawSpec, state: StateIndex, symbols: usize) -> Result<Transition, DecodeError> {
    match spec {
        RawSpec::Undefined => Ok(Transition::UNDEFINED),
        RawSpec::Instruction { write, shift, jump } => Ok(Transition {
            write: parse_write(write, state, symbols)?,
            shift: parse_shift(shift, state)?,
            next: parse_jump(jump, state)?,
        }),
    }
}

/// A write instruction is a decimal digit below the alphabet size.
fn parse_write(c: char, state: StateIndex, symbols: usize) -> Result<Symbol, DecodeError> {
    match c.to_digit(10) {
        Some(digit) if (digit as usize) < symbols => Ok(digit as Symbol),
        _ => Err(DecodeError::InvalidWrite { state, found: c }),
    }
}

fn parse_shift(c: char, state: StateIndex) -> Result<Direction, DecodeError> {
    match c {
        'R' => Ok(Direction::Right),
        'L' => Ok(Direction::Left),
        _ => Err(DecodeError::InvalidMove { state, found: c }),
    }
}

/// 'Z' always halts; any other capital letter names the state at its alphabet position.
fn parse_jump(c: char, state: StateIndex) -> Result<StateIndex, DecodeError> {
    match c {
        HALT_LETTER => Ok(HALT_STATE),
        'A'..='Y' => Ok((c as u8 - b'A') as StateIndex + 1),
        _ => Err(DecodeError::InvalidJump { state, found: c }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(write: Symbol, shift: Direction, next: StateIndex) -> Transition {
        Transition { write, shift, next }
    }

    #[test]
    fn test_decode_two_state_machine() {
        let machine = decode("1RB0RB_1LA1RZ", 2).unwrap();
        let table = machine.table();

        assert_eq!(table.states(), 2);
        assert_eq!(table.symbols(), 2);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(1, 0), Some(&t(1, Direction::Right, 2)));
        assert_eq!(table.get(1, 1), Some(&t(0, Direction::Right, 2)));
        assert_eq!(table.get(2, 0), Some(&t(1, Direction::Left, 1)));
        assert_eq!(table.get(2, 1), Some(&t(1, Direction::Right, HALT_STATE)));
    }

    #[test]
    fn test_undefined_spec_decodes_to_halt_writing_zero() {
        let machine = decode("1RB---_1LB0RB", 2).unwrap();
        assert_eq!(machine.table().get(1, 1), Some(&Transition::UNDEFINED));
        assert_eq!(
            machine.table().get(1, 1),
            Some(&t(0, Direction::Right, HALT_STATE))
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        let code = "1RB1LC_1RC1RB_1RD0LE_1LA1LD_1RZ0LA";
        assert_eq!(decode(code, 2), decode(code, 2));
        assert_eq!(decode("1RB1LC_1RC", 2), decode("1RB1LC_1RC", 2));
    }

    #[test]
    fn test_table_entries_are_in_range() {
        let code = "1RB2LA1RA_2LC1LB0RC_1RZ2RA1LC";
        let machine = decode(code, 3).unwrap();
        let table = machine.table();

        assert_eq!(table.len(), 3 * 3);
        for (_, _, transition) in table.iter() {
            assert!((transition.write as usize) < 3);
            assert!(transition.next <= 3);
        }
    }

    #[test]
    fn test_three_symbol_machine() {
        let machine = decode("1RB2LB1RZ_2LA2RB1LB", 3).unwrap();
        assert_eq!(machine.table().get(1, 1), Some(&t(2, Direction::Left, 2)));
        assert_eq!(machine.table().get(2, 2), Some(&t(1, Direction::Left, 2)));
    }

    #[test]
    fn test_jump_beyond_declared_states_is_rejected() {
        let result = decode("1RB1RC_1LA1RZ", 2);
        assert_eq!(
            result,
            Err(DecodeError::StateOrder {
                letter: 'C',
                states: 2
            })
        );
    }

    #[test]
    fn test_state_order_is_checked_before_tokens() {
        // 'x' in state A would be a wrong write, but the jump to 'D' is reported first.
        let result = decode("xRB1RD_1LA1RZ", 2);
        assert!(matches!(result, Err(DecodeError::StateOrder { letter: 'D', .. })));
    }

    #[test]
    fn test_halt_letter_is_allowed_with_any_state_count() {
        assert!(decode("1RZ1RZ", 2).is_ok());
        assert!(decode("------", 2).is_ok());
    }

    #[test]
    fn test_invalid_write() {
        assert_eq!(
            decode("1RB0RB_2LA1RZ", 2),
            Err(DecodeError::InvalidWrite {
                state: 2,
                found: '2'
            })
        );
    }

    #[test]
    fn test_invalid_move() {
        assert_eq!(
            decode("1SB0RB_1LA1RZ", 2),
            Err(DecodeError::InvalidMove {
                state: 1,
                found: 'S'
            })
        );
    }

    #[test]
    fn test_invalid_jump() {
        assert_eq!(
            decode("1RB0RB_1La1RZ", 2),
            Err(DecodeError::InvalidJump {
                state: 2,
                found: 'a'
            })
        );
    }

    #[test]
    fn test_partial_undefined_is_not_a_placeholder() {
        assert_eq!(
            decode("1RB--B_1LA1RZ", 2),
            Err(DecodeError::InvalidWrite {
                state: 1,
                found: '-'
            })
        );
    }

    #[test]
    fn test_block_width_mismatch() {
        assert_eq!(
            decode("1RB0RB_1LA", 2),
            Err(DecodeError::BlockWidth {
                state: 2,
                found: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_truncated_spec_is_a_syntax_error() {
        assert!(matches!(decode("1RB0R_1LA1RZ", 2), Err(DecodeError::Syntax(_))));
    }

    #[test]
    fn test_alphabet_size_bounds() {
        assert_eq!(decode("1RZ", 0), Err(DecodeError::AlphabetSize(0)));
        assert_eq!(decode("1RZ", 11), Err(DecodeError::AlphabetSize(11)));
        assert!(decode("1RZ", 1).is_err());
        assert!(decode("0RZ", 1).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let machine = decode("  1RB1LB_1LA1RZ\n", 2).unwrap();
        assert_eq!(machine.code(), "1RB1LB_1LA1RZ");
    }

    #[test]
    fn test_decode_with_blank() {
        let machine = decode_with_blank("1RB1LB_1LA1RZ", 2, 1).unwrap();
        assert_eq!(machine.all_tape(), 1);

        assert_eq!(
            decode_with_blank("1RB1LB_1LA1RZ", 2, 2),
            Err(DecodeError::InvalidBlank {
                blank: 2,
                symbols: 2
            })
        );
    }
}
