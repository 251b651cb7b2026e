use crate::models::PinPrompt;
use crate::services::TransferWizard;
use crate::utils::{format_money, format_timestamp};

use super::wizard::status;

pub async fn submit(wizard: &mut TransferWizard) -> Result<String, String> {
    match wizard.handle_submit().await {
        Ok(PinPrompt::Verify) => {
            Ok("🔐 Enter your transfer PIN with `pin <4 digits>` to send.".to_string())
        }
        Ok(PinPrompt::Create) => Ok(
            "🔐 You need a transfer PIN first. Create one with `newpin <pin> <confirm>`, then submit again."
                .to_string(),
        ),
        Ok(PinPrompt::Closed) => Ok(status(wizard)),
        Err(e) => Err(e.to_string()),
    }
}

/// `pin <digits>`: verify, then create the transfer
pub async fn verify_and_send(wizard: &mut TransferWizard, args: &[&str]) -> Result<String, String> {
    let Some(pin) = args.first() else {
        return Err("Usage: pin <4 digits>".to_string());
    };
    wizard.set_pin_input(*pin);

    let outcome = wizard.process_transfer().await.map_err(|e| e.to_string())?;
    let mut text = format!(
        "✅ Transfer submitted\n  Reference: {}\n  Amount: {}",
        outcome.reference,
        format_money(outcome.amount, &outcome.currency)
    );
    if let Some(created_at) = &outcome.created_at {
        text.push_str(&format!("\n  Submitted: {}", format_timestamp(created_at)));
    }
    if let Some(message) = outcome.completion_message.as_ref().or(outcome.message.as_ref()) {
        text.push_str(&format!("\n  {}", message));
    }
    Ok(text)
}

/// `newpin <pin> <confirm>`
pub async fn create(wizard: &mut TransferWizard, args: &[&str]) -> Result<String, String> {
    if wizard.pin_prompt() != PinPrompt::Create {
        return Err("No PIN setup in progress. Use `submit` from the amount step.".to_string());
    }
    let [new_pin, confirm_pin] = args else {
        return Err("Usage: newpin <pin> <confirm>".to_string());
    };
    wizard.set_new_pin_inputs(*new_pin, *confirm_pin);

    wizard.confirm_pin_setup().await.map_err(|e| e.to_string())?;
    Ok("✅ Transfer PIN created. Type `submit` again to send.".to_string())
}

pub fn cancel(wizard: &mut TransferWizard) -> String {
    wizard.cancel_pin_prompt();
    "PIN prompt closed".to_string()
}
