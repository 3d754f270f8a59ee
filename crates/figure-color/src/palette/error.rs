//! Error types for color parsing

use std::fmt;
use std::num::ParseIntError;

/// Error type for strict hex color parsing (`InvalidColorFormat`).
///
/// Only the strict entry points return this. Classification and palette
/// mapping swallow it per color so one bad value never aborts the analysis
/// of a whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Digit count after stripping `#` was not 3 or 6
    InvalidLength(usize),
    /// Non-hexadecimal content
    InvalidDigit(String),
    /// Hex channel failed to parse
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(len) => {
                write!(
                    f,
                    "invalid color format: expected 3 or 6 hex digits, got {}",
                    len
                )
            }
            ParseColorError::InvalidDigit(s) => {
                write!(f, "invalid color format: {:?} is not hexadecimal", s)
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid color format: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}
