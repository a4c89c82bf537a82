//! ISBN-13 identifiers derived from a shared sequence counter.
//!
//! An ISBN is a fixed 13-character string: the `978` Bookland prefix,
//! the allocated sequence value zero-padded to 9 digits, and a single
//! check digit computed over the first 12 characters with the standard
//! ISBN-13 weighting (1, 3, 1, 3, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed prefix for every generated identifier.
pub const ISBN_PREFIX: &str = "978";

/// Number of digits reserved for the sequence value.
pub const SEQUENCE_DIGITS: usize = 9;

/// Largest sequence value representable in [`SEQUENCE_DIGITS`] digits.
pub const MAX_SEQUENCE: u64 = 999_999_999;

/// Total length of an ISBN-13 string.
pub const ISBN_LEN: usize = 13;

/// Errors from ISBN construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    /// Input has the wrong number of characters.
    #[error("expected {expected} ASCII digits, got {got} characters")]
    InvalidLength { expected: usize, got: usize },

    /// Input contains a character that is not an ASCII digit.
    #[error("non-digit character at position {0}")]
    InvalidDigit(usize),

    /// The trailing check digit does not match the first 12 characters.
    #[error("check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },

    /// The sequence value no longer fits in the 9-digit payload.
    #[error("sequence value {0} exceeds the {SEQUENCE_DIGITS}-digit ISBN range")]
    SequenceExhausted(u64),
}

/// Compute the ISBN-13 check digit over a 12-digit prefix.
///
/// Digits at even positions are weighted 1, odd positions 3; the check
/// digit is `(10 - sum % 10) % 10`. Fails if the input is not exactly
/// 12 ASCII digits.
pub fn check_digit(prefix: &str) -> Result<u8, IsbnError> {
    let mut sum = 0u32;
    let mut count = 0usize;
    for (i, c) in prefix.chars().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return Err(IsbnError::InvalidDigit(i));
        };
        if i < ISBN_LEN - 1 {
            sum += digit * if i % 2 == 0 { 1 } else { 3 };
        }
        count = i + 1;
    }

    if count != ISBN_LEN - 1 {
        return Err(IsbnError::InvalidLength {
            expected: ISBN_LEN - 1,
            got: count,
        });
    }

    Ok(((10 - (sum % 10)) % 10) as u8)
}

/// A validated 13-character ISBN.
///
/// Construct with [`Isbn::from_sequence`] (generation) or
/// [`Isbn::parse`] (re-validation); both guarantee the check digit
/// invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Build the ISBN for an allocated sequence value.
    ///
    /// Fails with [`IsbnError::SequenceExhausted`] once the counter
    /// outgrows the 9-digit payload.
    pub fn from_sequence(value: u64) -> Result<Self, IsbnError> {
        if value > MAX_SEQUENCE {
            return Err(IsbnError::SequenceExhausted(value));
        }

        let mut s = format!("{ISBN_PREFIX}{value:0width$}", width = SEQUENCE_DIGITS);
        let digit = check_digit(&s)?;
        s.push((b'0' + digit) as char);
        Ok(Self(s))
    }

    /// Parse and validate an existing 13-character ISBN string.
    pub fn parse(s: &str) -> Result<Self, IsbnError> {
        let count = s.chars().count();
        if count != ISBN_LEN {
            return Err(IsbnError::InvalidLength {
                expected: ISBN_LEN,
                got: count,
            });
        }

        if let Some((i, _)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| c.to_digit(10).is_none())
        {
            return Err(IsbnError::InvalidDigit(i));
        }

        // All characters are ASCII digits, so byte indexing is safe.
        let expected = check_digit(&s[..ISBN_LEN - 1])?;
        let found = s.as_bytes()[ISBN_LEN - 1] - b'0';
        if expected != found {
            return Err(IsbnError::CheckDigitMismatch { expected, found });
        }

        Ok(Self(s.to_string()))
    }

    /// The ISBN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}
