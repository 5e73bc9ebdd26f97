//! Three-valued logic symbols used in LUT covers and flip-flop initial states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single symbol of a truth-table row.
///
/// The three states represent:
/// - `Zero` — the input (or output) is logic low
/// - `One` — the input (or output) is logic high
/// - `DontCare` — the input does not affect the row
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogicValue {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Either value matches.
    DontCare = 2,
}

impl LogicValue {
    /// Converts a cover character to a [`LogicValue`].
    ///
    /// Accepts '0', '1', and '-' (the cover notation for don't-care).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(LogicValue::Zero),
            '1' => Some(LogicValue::One),
            '-' => Some(LogicValue::DontCare),
            _ => None,
        }
    }

    /// Parses a whitespace-free cover row such as `"1-0"` into symbols.
    ///
    /// Returns `None` if any character is not a valid symbol.
    pub fn parse_row(row: &str) -> Option<Vec<Self>> {
        row.chars().map(Self::from_char).collect()
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicValue::Zero => write!(f, "0"),
            LogicValue::One => write!(f, "1"),
            LogicValue::DontCare => write!(f, "-"),
        }
    }
}

/// Rows of logic symbols stored opaquely on a block.
///
/// For a LUT this is the single-output cover of its logic function; for a
/// latch or flip-flop it is a single row holding the initial state.
pub type TruthTable = Vec<Vec<LogicValue>>;

#[cfg(test)]
mod tests {
    use super::LogicValue::{self, *};

    #[test]
    fn from_char_valid() {
        assert_eq!(LogicValue::from_char('0'), Some(Zero));
        assert_eq!(LogicValue::from_char('1'), Some(One));
        assert_eq!(LogicValue::from_char('-'), Some(DontCare));
    }

    #[test]
    fn from_char_invalid() {
        assert_eq!(LogicValue::from_char('x'), None);
        assert_eq!(LogicValue::from_char('2'), None);
    }

    #[test]
    fn parse_cover_row() {
        assert_eq!(LogicValue::parse_row("1-0"), Some(vec![One, DontCare, Zero]));
        assert_eq!(LogicValue::parse_row(""), Some(vec![]));
        assert_eq!(LogicValue::parse_row("1z"), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{Zero}"), "0");
        assert_eq!(format!("{One}"), "1");
        assert_eq!(format!("{DontCare}"), "-");
    }
}
