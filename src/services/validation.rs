//! UUID validation for file identifiers.
//!
//! The file service addresses files by UUID in the hyphenated `8-4-4-4-12`
//! form. Anything else (simple, braced, or URN notation) is rejected before a
//! request is ever built.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

const UUID_TEXT_LEN: usize = 36;
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Check whether `s` is a hyphenated UUID.
///
/// Hex digits are accepted in either case and no version or variant bits are
/// enforced. Runs in constant time over the fixed-size input and never
/// allocates.
pub fn is_valid_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != UUID_TEXT_LEN {
        return false;
    }

    bytes.iter().enumerate().all(|(i, b)| {
        if HYPHEN_POSITIONS.contains(&i) {
            *b == b'-'
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

/// A file identifier that has passed [`is_valid_uuid`].
///
/// The only way to obtain one is [`FileId::parse`], so request targets can
/// never be built from unchecked input. Displays as lowercase hyphenated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if !is_valid_uuid(input) {
            return Err(ValidationError::InvalidUuid(input.to_string()));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| ValidationError::InvalidUuid(input.to_string()))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
