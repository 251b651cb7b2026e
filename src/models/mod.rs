//! Data models for the transfer flow
//!
//! Form state, resolved requests, quotes and snapshots returned by the bank API.

pub mod account;
mod de;
pub mod fee;
pub mod field;
pub mod pin;
pub mod transfer;

pub(crate) use de::{opt_string_or_number, string_or_number};

// Re-export commonly used types for convenience
pub use account::{Account, AccountStatus, AuthContext, KycStatus, UserProfile};
pub use fee::{FeeQuote, FeeSource};
pub use field::{Field, FieldErrors};
pub use pin::{PinCode, PinPrompt, PinState, PIN_LENGTH};
pub use transfer::{
    Destination, DestinationFields, TransferDraft, TransferOutcome, TransferRequest,
    TransferType, WizardStep,
};
