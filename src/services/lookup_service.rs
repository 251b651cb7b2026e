//! Inline account-number and routing-number checks.
//!
//! These only ever produce feedback for one field. A lookup that cannot reach the
//! bank is reported as `Unavailable` and must not block navigation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::bank::{AccountLookupRequest, BankApi, LookupResponse, RoutingLookupRequest};
use crate::models::{Field, TransferType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Valid {
        bank_name: Option<String>,
        account_name: Option<String>,
    },
    Invalid(String),
    /// Nothing to check (empty input)
    Skipped,
    /// Bank could not be reached; leave the field's error as it is
    Unavailable,
}

impl LookupOutcome {
    fn from_response(response: LookupResponse, default_message: &str) -> Self {
        if response.valid {
            LookupOutcome::Valid {
                bank_name: response.bank_name.filter(|s| !s.trim().is_empty()),
                account_name: response.account_name.filter(|s| !s.trim().is_empty()),
            }
        } else {
            LookupOutcome::Invalid(
                response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| default_message.to_string()),
            )
        }
    }
}

/// Snapshot of the input a lookup was started for. The result is only applied
/// while the draft still holds the same value under the same transfer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub field: Field,
    pub value: String,
    pub transfer_type: TransferType,
}

#[derive(Clone)]
pub struct LookupService {
    api: Arc<dyn BankApi>,
}

impl LookupService {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self { api }
    }

    /// Run the check a ticket was issued for
    pub async fn run(&self, ticket: &LookupTicket) -> LookupOutcome {
        match ticket.field {
            Field::ToRoutingNumber => self.check_routing_number(&ticket.value).await,
            _ => self.check_account_number(&ticket.value, ticket.transfer_type).await,
        }
    }

    pub async fn check_account_number(
        &self,
        account_number: &str,
        transfer_type: TransferType,
    ) -> LookupOutcome {
        let account_number = account_number.trim();
        if account_number.is_empty() {
            return LookupOutcome::Skipped;
        }

        let request = AccountLookupRequest {
            account_number: account_number.to_string(),
            transfer_type,
        };
        match self.api.validate_account_number(&request).await {
            Ok(response) => {
                debug!("Account number lookup valid={}", response.valid);
                LookupOutcome::from_response(response, "Account number not found")
            }
            Err(e) => {
                warn!("Account number lookup failed: {}", e);
                LookupOutcome::Unavailable
            }
        }
    }

    pub async fn check_routing_number(&self, routing_number: &str) -> LookupOutcome {
        let routing_number = routing_number.trim();
        if routing_number.is_empty() {
            return LookupOutcome::Skipped;
        }

        let request = RoutingLookupRequest {
            routing_number: routing_number.to_string(),
        };
        match self.api.validate_routing_number(&request).await {
            Ok(response) => {
                debug!("Routing number lookup valid={}", response.valid);
                LookupOutcome::from_response(response, "Invalid routing number")
            }
            Err(e) => {
                warn!("Routing number lookup failed: {}", e);
                LookupOutcome::Unavailable
            }
        }
    }
}
