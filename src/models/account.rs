//! Account and profile snapshots fetched from the bank API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::string_or_number;

/// Lifecycle status of a bank account. Only `Active` accounts can be used in a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Frozen,
    Closed,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Read-only account snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub account_number: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub status: AccountStatus,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Label shown in account pickers, e.g. `Checking ••4821`
    pub fn display_label(&self) -> String {
        let name = self
            .account_name
            .as_deref()
            .or(self.account_type.as_deref())
            .unwrap_or("Account");
        let tail: String = self
            .account_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{} ••{}", name, tail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotStarted,
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// Subset of the user profile the transfer flow cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub is_verified: bool,
}

impl UserProfile {
    /// Funds may only move once the profile is both verified and KYC-approved
    pub fn can_transfer(&self) -> bool {
        self.is_verified && self.kyc_status == KycStatus::Approved
    }
}

/// Authenticated user handed to the wizard by whoever owns the session
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserializes_numeric_id_and_string_balance() {
        let account: Account = serde_json::from_str(
            r#"{"id": 42, "account_number": "100200304821", "account_name": "Checking",
                "balance": "1250.75", "status": "active"}"#,
        )
        .expect("valid account json");

        assert_eq!(account.id, "42");
        assert!(account.is_active());
        assert_eq!(account.currency, "USD");
        assert_eq!(account.display_label(), "Checking ••4821");
    }

    #[test]
    fn test_unknown_status_is_not_active() {
        let account: Account = serde_json::from_str(
            r#"{"id": "a1", "account_number": "1", "balance": 10, "status": "dormant"}"#,
        )
        .expect("valid account json");

        assert_eq!(account.status, AccountStatus::Unknown);
        assert!(!account.is_active());
    }

    #[test]
    fn test_profile_requires_verification_and_approval() {
        let approved_unverified = UserProfile {
            email: None,
            kyc_status: KycStatus::Approved,
            is_verified: false,
        };
        let verified_pending = UserProfile {
            email: None,
            kyc_status: KycStatus::Pending,
            is_verified: true,
        };
        let ok = UserProfile {
            email: None,
            kyc_status: KycStatus::Approved,
            is_verified: true,
        };

        assert!(!approved_unverified.can_transfer());
        assert!(!verified_pending.can_transfer());
        assert!(ok.can_transfer());
    }
}
