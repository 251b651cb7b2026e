//! Transfer PIN models

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::utils::errors::PinError;

pub const PIN_LENGTH: usize = 4;

/// Whether the user has a transfer PIN on file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinState {
    /// Status not fetched yet (or the fetch failed)
    #[default]
    Unknown,
    Unset,
    Set,
}

/// Which PIN prompt the wizard is showing, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinPrompt {
    #[default]
    Closed,
    Create,
    Verify,
}

/// A well-formed 4-digit transfer PIN.
///
/// Never printed; the buffer is wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PinCode([u8; PIN_LENGTH]);

impl PinCode {
    pub fn parse(input: &str) -> Result<Self, PinError> {
        let bytes = input.as_bytes();
        if bytes.len() != PIN_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(PinError::InvalidFormat);
        }
        let mut digits = [0u8; PIN_LENGTH];
        digits.copy_from_slice(bytes);
        Ok(Self(digits))
    }

    /// Digits as sent to the bank API, wiped when the returned value is dropped
    pub fn expose(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.iter().map(|&b| b as char).collect())
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCode(****)")
    }
}
