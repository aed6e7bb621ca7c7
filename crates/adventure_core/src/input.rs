//! Parsing for free-text answers typed at the console.

use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please enter a value")]
    Empty,
    #[error("'{0}' is not a valid number")]
    NotANumber(String),
    #[error("{value} must be between {min} and {max}")]
    OutOfRange { value: u64, min: u32, max: u32 },
}

/// Digits only (no sign, no spaces inside), then range-checked.
pub fn parse_quantity(text: &str, range: RangeInclusive<u32>) -> Result<u32, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber(text.to_owned()));
    }
    let value: u64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_owned()))?;
    let (min, max) = (*range.start(), *range.end());
    if value < u64::from(min) || value > u64::from(max) {
        return Err(InputError::OutOfRange { value, min, max });
    }
    Ok(value as u32)
}

/// `yes` or `y`, any case. Everything else is a no.
pub fn parse_confirmation(text: &str) -> bool {
    matches!(text.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}
