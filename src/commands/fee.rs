use crate::models::FeeSource;
use crate::services::TransferWizard;
use crate::utils::{format_money, Table};

/// Fee breakdown for the draft as it stands, fetching a quote if none is cached
pub async fn execute(wizard: &mut TransferWizard) -> Result<String, String> {
    wizard.on_input_changed().await;

    let Some(quote) = wizard.fee_quote() else {
        return Err("Enter an amount greater than 0 to see fees".to_string());
    };
    let currency = wizard.draft().currency.clone();

    let mut table = Table::new(vec!["", "Amount"]).align_right(1);
    table.add_row(vec!["Amount".to_string(), format_money(quote.amount, &currency)]);
    table.add_row(vec!["Base fee".to_string(), format_money(quote.base_fee, &currency)]);
    if !quote.network_fee.is_zero() {
        table.add_row(vec![
            "Network fee".to_string(),
            format_money(quote.network_fee, &currency),
        ]);
    }
    table.add_row(vec!["Total fee".to_string(), format_money(quote.total_fee, &currency)]);

    let total_label = if quote.is_estimate() {
        "Total (estimate)"
    } else {
        "Total"
    };
    table.add_row(vec![total_label.to_string(), format_money(quote.total_cost, &currency)]);

    let mut text = format!("💵 {}\n{}", quote.transfer_type.title(), table.render());
    if let FeeSource::Fallback { .. } = quote.source {
        text.push_str("\nFees could not be confirmed with the bank; this is an estimate.");
    }
    Ok(text)
}
