use crate::services::TransferWizard;
use crate::utils::{format_money, Table};

pub fn execute(wizard: &TransferWizard) -> String {
    if wizard.accounts_loading() {
        return "⏳ Loading accounts...".to_string();
    }
    if wizard.accounts().is_empty() {
        return "No active accounts available".to_string();
    }

    let selected = wizard.draft().from_account_id.as_deref();
    let mut table = Table::new(vec!["", "ID", "Account", "Balance"]).align_right(3);
    for account in wizard.accounts() {
        let marker = if Some(account.id.as_str()) == selected { "*" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            account.id.clone(),
            account.display_label(),
            format_money(account.balance, &account.currency),
        ]);
    }

    format!("{}\n* = selected source account", table.render())
}
