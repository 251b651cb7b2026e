//! Line-oriented console over the transfer wizard.
//!
//! Each command renders plain text; errors come back as `Err(String)` and get a ❌ prefix.

pub mod accounts;
pub mod fee;
pub mod help;
pub mod pin;
pub mod wizard;

use tracing::debug;

use crate::services::TransferWizard;

/// What the driver loop should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub async fn handle_line(wizard: &mut TransferWizard, line: &str) -> Reply {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Reply::Output(String::new());
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];
    // Never log the arguments; they can carry a PIN
    debug!("Console command: {}", command);

    let result = match command.as_str() {
        "help" | "?" => Ok(help::execute()),
        "accounts" | "acc" => Ok(accounts::execute(wizard)),
        "type" => wizard::select_type(wizard, args).await,
        "from" => wizard::select_account(wizard, args),
        "set" => wizard::set_field(wizard, args).await,
        "next" | "n" => Ok(wizard::next(wizard)),
        "back" | "b" => Ok(wizard::back(wizard)),
        "status" | "s" => Ok(wizard::status(wizard)),
        "dismiss" => Ok(wizard::dismiss(wizard)),
        "new" | "reset" => Ok(wizard::reset(wizard)),
        "fee" => fee::execute(wizard).await,
        "submit" => pin::submit(wizard).await,
        "pin" => pin::verify_and_send(wizard, args).await,
        "newpin" => pin::create(wizard, args).await,
        "cancel" => Ok(pin::cancel(wizard)),
        "quit" | "exit" | "q" => return Reply::Quit,
        other => Err(format!("Unknown command '{}'. Type `help` for a list.", other)),
    };

    match result {
        Ok(text) => Reply::Output(text),
        Err(e) => Reply::Output(format!("❌ {}", e)),
    }
}
