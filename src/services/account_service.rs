//! Account Selector

use std::sync::Arc;

use tracing::debug;

use crate::api::bank::{ApiError, BankApi};
use crate::models::Account;

pub struct AccountSelector {
    api: Arc<dyn BankApi>,
}

impl AccountSelector {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self { api }
    }

    /// Load the user's accounts, keeping only the ones that can be used in a transfer
    pub async fn load_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let accounts = self.api.list_accounts().await?;
        let total = accounts.len();
        let active: Vec<Account> = accounts.into_iter().filter(Account::is_active).collect();
        debug!("Loaded {} accounts ({} active)", total, active.len());
        Ok(active)
    }
}

/// Active account with the highest balance. Ties go to the account listed first.
pub fn default_account(accounts: &[Account]) -> Option<&Account> {
    accounts
        .iter()
        .filter(|a| a.is_active())
        .fold(None, |best: Option<&Account>, account| match best {
            Some(b) if b.balance >= account.balance => Some(b),
            _ => Some(account),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bank::mock::{account, MockBank};
    use crate::models::AccountStatus;

    #[test]
    fn test_highest_balance_wins() {
        let accounts = vec![
            account("A", 100, AccountStatus::Active),
            account("B", 500, AccountStatus::Active),
        ];
        assert_eq!(default_account(&accounts).map(|a| a.id.as_str()), Some("B"));
    }

    #[test]
    fn test_inactive_accounts_are_never_default() {
        let accounts = vec![
            account("A", 100, AccountStatus::Active),
            account("F", 90_000, AccountStatus::Frozen),
        ];
        assert_eq!(default_account(&accounts).map(|a| a.id.as_str()), Some("A"));
        assert!(default_account(&[]).is_none());
    }

    #[test]
    fn test_tie_keeps_first() {
        let accounts = vec![
            account("A", 300, AccountStatus::Active),
            account("B", 300, AccountStatus::Active),
        ];
        assert_eq!(default_account(&accounts).map(|a| a.id.as_str()), Some("A"));
    }

    #[tokio::test]
    async fn test_load_filters_inactive() {
        let bank = Arc::new(MockBank::new().with_accounts(vec![
            account("A", 100, AccountStatus::Active),
            account("C", 700, AccountStatus::Closed),
            account("B", 500, AccountStatus::Active),
        ]));
        let selector = AccountSelector::new(bank);

        let active = selector.load_accounts().await.expect("accounts");
        let ids: Vec<&str> = active.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
