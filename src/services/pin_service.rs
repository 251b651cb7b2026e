//! Transfer PIN Gate
//!
//! Funds never move without a fresh `verify_pin` in the same submission.
//! The gate keeps no PIN material between calls.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::bank::{ApiError, BankApi, SetPinRequest, VerifyPinRequest};
use crate::models::{PinCode, PinState};
use crate::utils::errors::{user_message, PinError};

/// Answer to a verification round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinVerification {
    pub valid: bool,
    /// Server wording, verbatim, when the server gave one
    pub message: Option<String>,
}

pub struct TransferPinGate {
    api: Arc<dyn BankApi>,
    state: PinState,
    loading: bool,
}

impl TransferPinGate {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self {
            api,
            state: PinState::Unknown,
            loading: false,
        }
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch whether a PIN is on file. A failed fetch leaves the state `Unknown`.
    pub async fn check_status(&mut self) -> PinState {
        self.loading = true;
        match self.api.transfer_pin_status().await {
            Ok(status) => {
                self.state = if status.has_pin {
                    PinState::Set
                } else {
                    PinState::Unset
                };
                debug!("Transfer PIN status: {:?}", self.state);
            }
            Err(e) => {
                warn!("Failed to check transfer PIN status: {}", e);
            }
        }
        self.loading = false;
        self.state
    }

    /// Create the transfer PIN. Both entries must match and be exactly 4 digits;
    /// otherwise nothing is sent.
    pub async fn set_pin(&mut self, new_pin: &str, confirm_pin: &str) -> Result<(), PinError> {
        if new_pin != confirm_pin {
            return Err(PinError::Mismatch);
        }
        let pin = PinCode::parse(new_pin)?;

        let request = SetPinRequest {
            pin: pin.expose().to_string(),
            confirm_pin: pin.expose().to_string(),
        };

        self.loading = true;
        let result = self.api.set_transfer_pin(&request).await;
        self.loading = false;
        drop(request);

        match result {
            Ok(()) => {
                info!("Transfer PIN set");
                self.state = PinState::Set;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to set transfer PIN: {}", e);
                Err(PinError::Api(user_message(&e)))
            }
        }
    }

    /// Check a PIN against the bank. A malformed PIN fails locally.
    ///
    /// A 401 is the expected "wrong PIN" answer and comes back as
    /// `Ok(PinVerification { valid: false, .. })`, not as an error.
    pub async fn verify_pin(&self, pin: &str) -> Result<PinVerification, PinError> {
        let pin = PinCode::parse(pin)?;
        let request = VerifyPinRequest {
            pin: pin.expose().to_string(),
        };
        drop(pin);

        let result = self.api.verify_transfer_pin(&request).await;
        drop(request);

        match result {
            Ok(response) => Ok(PinVerification {
                valid: response.valid,
                message: response.message.filter(|m| !m.trim().is_empty()),
            }),
            Err(ApiError::Unauthorized(message)) => {
                debug!("Transfer PIN rejected");
                Ok(PinVerification {
                    valid: false,
                    message: Some(message).filter(|m| !m.trim().is_empty()),
                })
            }
            Err(ApiError::BadRequest { message, .. }) => Ok(PinVerification {
                valid: false,
                message: Some(message).filter(|m| !m.trim().is_empty()),
            }),
            Err(e) => {
                warn!("Transfer PIN verification failed: {}", e);
                Err(PinError::Api(user_message(&e)))
            }
        }
    }
}
