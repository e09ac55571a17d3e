use frame_assault_core::{AttackKey, Direction, PlayerInput};
use thiserror::Error;

/// Errors raised while reading an input script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The script contained a symbol that maps to no input.
    #[error("unknown input symbol {symbol:?} at position {position}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Character offset of the symbol within the script.
        position: usize,
    },
}

/// Per-tick player inputs replayed by the headless runner.
///
/// Each symbol occupies one tick: `^ v < >` move, `a`-`h` attack the enemy
/// bound to that letter, and `.` idles. Whitespace and commas are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Option<PlayerInput>>,
}

impl Script {
    /// Parses a script from its textual form.
    pub(crate) fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (position, symbol) in source.chars().enumerate() {
            if symbol.is_whitespace() || symbol == ',' {
                continue;
            }
            steps.push(parse_symbol(symbol).ok_or(ScriptError::UnknownSymbol { symbol, position })?);
        }
        Ok(Self { steps })
    }

    /// Input scheduled for the zero-based `tick`, if any.
    pub(crate) fn input_at(&self, tick: usize) -> Option<PlayerInput> {
        self.steps.get(tick).copied().flatten()
    }

    /// Number of ticks the script covers.
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

fn parse_symbol(symbol: char) -> Option<Option<PlayerInput>> {
    let input = match symbol {
        '.' => return Some(None),
        '^' => PlayerInput::Move(Direction::Up),
        'v' | 'V' => PlayerInput::Move(Direction::Down),
        '<' => PlayerInput::Move(Direction::Left),
        '>' => PlayerInput::Move(Direction::Right),
        letter => PlayerInput::Attack(AttackKey::from_char(letter)?),
    };
    Some(Some(input))
}
