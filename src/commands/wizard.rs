use crate::models::{Field, PinPrompt, TransferType, WizardStep};
use crate::services::TransferWizard;
use crate::utils::{format_money, format_timestamp};

pub async fn select_type(wizard: &mut TransferWizard, args: &[&str]) -> Result<String, String> {
    let Some(raw) = args.first() else {
        let options: Vec<&str> = TransferType::ALL.iter().map(|t| t.as_str()).collect();
        return Err(format!("Usage: type <{}>", options.join("|")));
    };
    let transfer_type: TransferType = raw.parse()?;

    wizard.select_transfer_type(transfer_type);
    wizard.on_input_changed().await;
    Ok(format!("✅ {} selected", transfer_type.title()))
}

pub fn select_account(wizard: &mut TransferWizard, args: &[&str]) -> Result<String, String> {
    let Some(id) = args.first() else {
        return Err("Usage: from <account id>".to_string());
    };
    if !wizard.select_from_account(id) {
        return Err(field_error(wizard, Field::FromAccountId));
    }
    let label = wizard
        .selected_account()
        .map(|a| a.display_label())
        .unwrap_or_default();
    Ok(format!("✅ Sending from {}", label))
}

/// `set <field> <value...>`; the value keeps its inner spaces
pub async fn set_field(wizard: &mut TransferWizard, args: &[&str]) -> Result<String, String> {
    if args.is_empty() {
        return Err("Usage: set <field> <value>".to_string());
    }
    let field = Field::from_api_key(&args[0].to_lowercase());
    if field == Field::General {
        return Err(format!("Unknown field '{}'", args[0]));
    }
    let value = args[1..].join(" ");
    let prompt_was_open = wizard.pin_prompt() != PinPrompt::Closed;

    wizard.set_field(field, value);
    match field {
        Field::FromAccountId => {}
        Field::Amount => wizard.on_input_changed().await,
        Field::ToAccountNumber | Field::ToIban => wizard.check_destination_account().await,
        Field::ToRoutingNumber => wizard.check_routing_number().await,
        _ => {}
    }

    let closed_note = if prompt_was_open && wizard.pin_prompt() == PinPrompt::Closed {
        "\nPIN prompt closed because the transfer changed. Use `submit` again."
    } else {
        ""
    };
    match wizard.errors().get(field) {
        Some(message) => Err(format!("{}: {}{}", field.label(), message, closed_note)),
        None => Ok(format!("✅ {} updated{}", field.label(), closed_note)),
    }
}

pub fn next(wizard: &mut TransferWizard) -> String {
    let before = wizard.step();
    if wizard.handle_next() {
        return status(wizard);
    }
    if before == WizardStep::Amount && wizard.errors().is_empty() {
        return "Ready to send. Type `submit` to continue.".to_string();
    }
    format!("❌ Please fix the following:\n{}", render_errors(wizard))
}

pub fn back(wizard: &mut TransferWizard) -> String {
    wizard.handle_previous();
    status(wizard)
}

pub fn dismiss(wizard: &mut TransferWizard) -> String {
    wizard.dismiss_general_error();
    "Dismissed".to_string()
}

pub fn reset(wizard: &mut TransferWizard) -> String {
    wizard.reset();
    format!("🆕 New transfer\n{}", status(wizard))
}

pub fn status(wizard: &TransferWizard) -> String {
    let step = wizard.step();
    let draft = wizard.draft();
    let mut lines = vec![format!("Step {}/4: {}", step.number(), step.title())];

    match step {
        WizardStep::SelectType => {
            lines.push(format!("  Type: {}", draft.transfer_type.title()));
        }
        WizardStep::Details => {
            let source = wizard
                .selected_account()
                .map(|a| a.display_label())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!("  From: {}", source));
            lines.push(format!("  {}: {}", Field::RecipientName.label(), draft.recipient_name));
            for field in draft.transfer_type.required_destination_fields() {
                lines.push(format!("  {}: {}", field.label(), draft.value(*field)));
            }
        }
        WizardStep::Amount => {
            lines.push(format!("  Amount: {} {}", draft.amount, draft.currency));
            lines.push(format!("  Description: {}", draft.description));
            if wizard.fee_loading() {
                lines.push("  Fees: calculating...".to_string());
            } else if let Some(quote) = wizard.fee_quote() {
                let suffix = if quote.is_estimate() { " (estimate)" } else { "" };
                lines.push(format!(
                    "  Total: {}{}",
                    format_money(quote.total_cost, &draft.currency),
                    suffix
                ));
            }
        }
        WizardStep::Result => {
            if let Some(result) = wizard.result() {
                lines.push(format!("  Reference: {}", result.reference));
                lines.push(format!(
                    "  Amount: {}",
                    format_money(result.amount, &result.currency)
                ));
                if let Some(status) = &result.status {
                    lines.push(format!("  Status: {}", status));
                }
                if let Some(created_at) = &result.created_at {
                    lines.push(format!("  Submitted: {}", format_timestamp(created_at)));
                }
                if let Some(message) = result.completion_message.as_ref().or(result.message.as_ref()) {
                    lines.push(format!("  {}", message));
                }
            }
        }
    }

    match wizard.pin_prompt() {
        PinPrompt::Closed => {}
        PinPrompt::Create => lines.push("🔐 Create a transfer PIN: `newpin <pin> <confirm>`".to_string()),
        PinPrompt::Verify => lines.push("🔐 Enter your transfer PIN: `pin <4 digits>`".to_string()),
    }
    if let Some(error) = wizard.pin_error() {
        lines.push(format!("  PIN: {}", error));
    }
    if !wizard.errors().is_empty() {
        lines.push(render_errors(wizard));
    }

    lines.join("\n")
}

fn field_error(wizard: &TransferWizard, field: Field) -> String {
    wizard
        .errors()
        .get(field)
        .unwrap_or("Invalid value")
        .to_string()
}

fn render_errors(wizard: &TransferWizard) -> String {
    wizard
        .errors()
        .iter()
        .map(|(field, message)| match field {
            Field::General => format!("  ⚠️ {}", message),
            _ => format!("  • {}: {}", field.label(), message),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
