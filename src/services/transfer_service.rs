//! Transfer Wizard Controller
//!
//! Owns the draft, the error map and the step cursor for one wizard session.
//! Steps: 1 pick a transfer type, 2 recipient details, 3 amount, 4 result.
//!
//! Submitting from step 3 never moves money by itself. It opens a PIN prompt
//! (create or verify) and stops. Only [`TransferWizard::process_transfer`], run after a
//! successful PIN verification, calls the bank's create-transfer endpoint.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::api::bank::{ApiError, BankApi};
use crate::models::{
    Account, AuthContext, FeeQuote, Field, FieldErrors, PinPrompt, PinState, TransferDraft,
    TransferOutcome, TransferRequest, TransferType, WizardStep,
};
use crate::services::account_service::{default_account, AccountSelector};
use crate::services::fee_service::{FallbackNetworkFee, FeeEstimator, FeeTicket};
use crate::services::lookup_service::{LookupOutcome, LookupService, LookupTicket};
use crate::services::notification_service::notify_transfer_submitted;
use crate::services::pin_service::TransferPinGate;
use crate::utils::errors::{
    user_message, PinError, SubmitError, INVALID_PIN_MESSAGE, NO_ACTIVE_ACCOUNTS_MESSAGE,
};

/// Fields validated on the recipient details step
const DETAIL_FIELDS: [Field; 9] = [
    Field::FromAccountId,
    Field::RecipientName,
    Field::ToAccountNumber,
    Field::ToRoutingNumber,
    Field::ToBankName,
    Field::ToSwiftCode,
    Field::ToIban,
    Field::ToBankCountry,
    Field::BeneficiaryAddress,
];

/// Fields validated on the amount step
const AMOUNT_FIELDS: [Field; 2] = [Field::Amount, Field::Description];

pub struct TransferWizard {
    api: Arc<dyn BankApi>,
    auth: AuthContext,
    accounts: AccountSelector,
    pin_gate: TransferPinGate,
    fees: FeeEstimator,
    lookups: LookupService,

    step: WizardStep,
    draft: TransferDraft,
    errors: FieldErrors,
    available_accounts: Vec<Account>,
    fee_quote: Option<FeeQuote>,
    result: Option<TransferOutcome>,

    pin_prompt: PinPrompt,
    pin_input: Zeroizing<String>,
    new_pin_input: Zeroizing<String>,
    confirm_pin_input: Zeroizing<String>,
    pin_error: Option<String>,

    is_loading: bool,
    accounts_loading: bool,
    fee_loading: bool,
}

impl TransferWizard {
    pub fn new(
        api: Arc<dyn BankApi>,
        auth: AuthContext,
        fallback_network_fee: FallbackNetworkFee,
    ) -> Self {
        Self {
            accounts: AccountSelector::new(api.clone()),
            pin_gate: TransferPinGate::new(api.clone()),
            fees: FeeEstimator::new(api.clone(), fallback_network_fee),
            lookups: LookupService::new(api.clone()),
            api,
            auth,
            step: WizardStep::default(),
            draft: TransferDraft::default(),
            errors: FieldErrors::new(),
            available_accounts: Vec::new(),
            fee_quote: None,
            result: None,
            pin_prompt: PinPrompt::Closed,
            pin_input: Zeroizing::default(),
            new_pin_input: Zeroizing::default(),
            confirm_pin_input: Zeroizing::default(),
            pin_error: None,
            is_loading: false,
            accounts_loading: false,
            fee_loading: false,
        }
    }

    /// Load accounts and PIN status. The two calls run concurrently and may finish
    /// in any order.
    pub async fn initialize(&mut self) {
        self.accounts_loading = true;
        let (accounts, pin_state) =
            tokio::join!(self.accounts.load_accounts(), self.pin_gate.check_status());
        self.accounts_loading = false;

        debug!("Wizard initialised, PIN state {:?}", pin_state);
        match accounts {
            Ok(accounts) => self.apply_accounts(accounts),
            Err(e) => {
                warn!("Failed to load accounts: {}", e);
                self.errors.set(
                    Field::General,
                    format!("Failed to load accounts. {}", user_message(&e)),
                );
            }
        }
    }

    fn apply_accounts(&mut self, accounts: Vec<Account>) {
        self.available_accounts = accounts;

        if self.available_accounts.is_empty() {
            self.draft.from_account_id = None;
            self.errors.set(Field::FromAccountId, NO_ACTIVE_ACCOUNTS_MESSAGE);
            return;
        }

        let still_valid = self
            .draft
            .from_account_id
            .as_deref()
            .is_some_and(|id| self.available_accounts.iter().any(|a| a.id == id));
        if !still_valid {
            self.draft.from_account_id = default_account(&self.available_accounts).map(|a| a.id.clone());
        }
        if let Some(currency) = self.selected_account().map(|a| a.currency.clone()) {
            self.draft.currency = currency;
        }
        self.errors.clear(Field::FromAccountId);
    }

    // ---- accessors ----

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &TransferDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn accounts(&self) -> &[Account] {
        &self.available_accounts
    }

    pub fn selected_account(&self) -> Option<&Account> {
        let id = self.draft.from_account_id.as_deref()?;
        self.available_accounts.iter().find(|a| a.id == id)
    }

    pub fn fee_quote(&self) -> Option<&FeeQuote> {
        self.fee_quote.as_ref()
    }

    pub fn result(&self) -> Option<&TransferOutcome> {
        self.result.as_ref()
    }

    pub fn pin_prompt(&self) -> PinPrompt {
        self.pin_prompt
    }

    pub fn pin_state(&self) -> PinState {
        self.pin_gate.state()
    }

    pub fn pin_error(&self) -> Option<&str> {
        self.pin_error.as_deref()
    }

    pub fn pin_input(&self) -> &str {
        &self.pin_input
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn accounts_loading(&self) -> bool {
        self.accounts_loading
    }

    pub fn fee_loading(&self) -> bool {
        self.fee_loading
    }

    pub fn pin_loading(&self) -> bool {
        self.pin_gate.is_loading()
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    // ---- input ----

    /// Step 1 selection. Errors for destination fields the new type does not use are dropped.
    pub fn select_transfer_type(&mut self, transfer_type: TransferType) {
        self.close_prompt_on_edit();
        self.draft.transfer_type = transfer_type;
        let required = transfer_type.required_destination_fields();
        for field in DETAIL_FIELDS.iter().skip(2) {
            if !required.contains(field) {
                self.errors.clear(*field);
            }
        }
    }

    /// Pick the source account; only active accounts of this user are accepted
    pub fn select_from_account(&mut self, account_id: &str) -> bool {
        let Some(account) = self.available_accounts.iter().find(|a| a.id == account_id) else {
            self.errors.set(Field::FromAccountId, "Please select one of your active accounts");
            return false;
        };
        let (id, currency) = (account.id.clone(), account.currency.clone());
        self.close_prompt_on_edit();
        self.draft.currency = currency;
        self.draft.from_account_id = Some(id);
        self.errors.clear(Field::FromAccountId);
        true
    }

    /// Write one draft field and clear its error.
    /// Follow amount changes with [`on_input_changed`](Self::on_input_changed).
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::FromAccountId {
            let value = value.into();
            self.select_from_account(value.trim());
            return;
        }
        self.close_prompt_on_edit();
        self.draft.set_value(field, value);
        self.errors.clear(field);
    }

    /// A PIN prompt answers the draft as it was submitted. Editing the draft drops it,
    /// so a verified PIN can never send values that skipped validation.
    fn close_prompt_on_edit(&mut self) {
        if self.pin_prompt != PinPrompt::Closed {
            debug!("Draft edited while the PIN prompt was open; closing it");
            self.cancel_pin_prompt();
        }
    }

    pub fn set_pin_input(&mut self, pin: impl Into<String>) {
        self.pin_input = Zeroizing::new(pin.into());
    }

    pub fn set_new_pin_inputs(&mut self, new_pin: impl Into<String>, confirm_pin: impl Into<String>) {
        self.new_pin_input = Zeroizing::new(new_pin.into());
        self.confirm_pin_input = Zeroizing::new(confirm_pin.into());
    }

    pub fn cancel_pin_prompt(&mut self) {
        self.pin_prompt = PinPrompt::Closed;
        self.pin_input.zeroize();
        self.new_pin_input.zeroize();
        self.confirm_pin_input.zeroize();
        self.pin_error = None;
    }

    pub fn dismiss_general_error(&mut self) {
        self.errors.clear(Field::General);
    }

    // ---- fees ----

    /// Recompute the fee quote after the amount or transfer type changed.
    ///
    /// Calling it again with unchanged inputs does nothing. A quote that comes back
    /// after the inputs moved on is dropped.
    pub async fn on_input_changed(&mut self) {
        let transfer_type = self.draft.transfer_type;
        let Some(amount) = self.draft.sendable_amount() else {
            self.fee_quote = None;
            self.fee_loading = false;
            return;
        };

        if let Some(quote) = &self.fee_quote {
            if quote.amount == amount && quote.transfer_type == transfer_type {
                return;
            }
        }

        let ticket = self.fees.begin(amount, transfer_type);
        self.fee_loading = true;
        let quote = self.fees.estimate(amount, transfer_type).await;
        self.apply_fee_quote(ticket, quote);
    }

    /// Store a quote if it still answers the current inputs. Returns whether it was kept.
    fn apply_fee_quote(&mut self, ticket: FeeTicket, quote: FeeQuote) -> bool {
        let inputs_match = self.draft.transfer_type == ticket.transfer_type
            && self.draft.parsed_amount() == Some(ticket.amount);
        if !self.fees.is_current(&ticket) || !inputs_match {
            debug!("Discarding stale fee quote for {} {}", ticket.transfer_type, ticket.amount);
            return false;
        }
        self.fee_loading = false;
        self.fee_quote = Some(quote);
        true
    }

    // ---- live lookups ----

    /// Start a destination account check. International transfers check the IBAN.
    pub fn begin_destination_lookup(&self) -> LookupTicket {
        let field = match self.draft.transfer_type {
            TransferType::International => Field::ToIban,
            _ => Field::ToAccountNumber,
        };
        self.lookup_ticket(field)
    }

    pub fn begin_routing_lookup(&self) -> LookupTicket {
        self.lookup_ticket(Field::ToRoutingNumber)
    }

    fn lookup_ticket(&self, field: Field) -> LookupTicket {
        LookupTicket {
            field,
            value: self.draft.value(field).to_string(),
            transfer_type: self.draft.transfer_type,
        }
    }

    /// Handle for running a lookup without borrowing the wizard
    pub fn lookup_service(&self) -> LookupService {
        self.lookups.clone()
    }

    /// Apply a lookup result to its own field only. Returns false and changes nothing
    /// when the field or transfer type moved on since the ticket was issued.
    /// A known bank for a routing number fills an empty bank name.
    pub fn apply_lookup_result(&mut self, ticket: &LookupTicket, outcome: LookupOutcome) -> bool {
        if self.draft.value(ticket.field) != ticket.value
            || self.draft.transfer_type != ticket.transfer_type
        {
            debug!("Ignoring {} lookup for superseded input", ticket.field);
            return false;
        }

        match outcome {
            LookupOutcome::Valid { bank_name, .. } => {
                self.errors.clear(ticket.field);
                if let (Field::ToRoutingNumber, Some(bank_name)) = (ticket.field, bank_name) {
                    if self.draft.destination.to_bank_name.trim().is_empty() {
                        self.draft.destination.to_bank_name = bank_name;
                        self.errors.clear(Field::ToBankName);
                    }
                }
            }
            LookupOutcome::Invalid(message) => self.errors.set(ticket.field, message),
            LookupOutcome::Skipped | LookupOutcome::Unavailable => {}
        }
        true
    }

    /// Check the destination account number with the bank and update only its error
    pub async fn check_destination_account(&mut self) {
        let ticket = self.begin_destination_lookup();
        let outcome = self.lookups.run(&ticket).await;
        self.apply_lookup_result(&ticket, outcome);
    }

    /// Check the routing number; a known bank fills an empty bank name
    pub async fn check_routing_number(&mut self) {
        let ticket = self.begin_routing_lookup();
        let outcome = self.lookups.run(&ticket).await;
        self.apply_lookup_result(&ticket, outcome);
    }

    // ---- navigation ----

    /// Validate one step against the draft. Rewrites that step's errors only.
    pub fn validate_step(&mut self, step: WizardStep) -> bool {
        match step {
            WizardStep::SelectType | WizardStep::Result => true,
            WizardStep::Details => {
                let mut found = self.draft.validate_details();
                if self.available_accounts.is_empty() && !self.accounts_loading {
                    found.set(Field::FromAccountId, NO_ACTIVE_ACCOUNTS_MESSAGE);
                }
                self.errors.clear_all(&DETAIL_FIELDS);
                let ok = found.is_empty();
                self.errors.merge(found);
                ok
            }
            WizardStep::Amount => {
                let found = self.draft.validate_amount();
                self.errors.clear_all(&AMOUNT_FIELDS);
                let ok = found.is_empty();
                self.errors.merge(found);
                ok
            }
        }
    }

    /// Advance one step if the current one validates. Returns whether the step changed.
    ///
    /// The amount step only moves on through a completed transfer, so here it just validates.
    pub fn handle_next(&mut self) -> bool {
        if self.step == WizardStep::Result {
            return false;
        }
        if !self.validate_step(self.step) {
            debug!("Step {} has {} errors", self.step.number(), self.errors.len());
            return false;
        }
        if self.step == WizardStep::Amount {
            return false;
        }
        self.step = self.step.next();
        true
    }

    /// Go back one step without validating. The result step is final; use [`reset`](Self::reset).
    pub fn handle_previous(&mut self) {
        if self.step == WizardStep::Result {
            return;
        }
        self.step = self.step.previous();
    }

    /// Discard the draft and start over, keeping the loaded accounts
    pub fn reset(&mut self) {
        self.cancel_pin_prompt();
        self.step = WizardStep::SelectType;
        self.draft = TransferDraft::default();
        self.errors = FieldErrors::new();
        self.fee_quote = None;
        self.fee_loading = false;
        self.result = None;
        let accounts = std::mem::take(&mut self.available_accounts);
        self.apply_accounts(accounts);
    }

    // ---- submission ----

    /// Submit from the amount step. Opens the PIN prompt that has to be completed next.
    ///
    /// No transfer is created here.
    pub async fn handle_submit(&mut self) -> Result<PinPrompt, SubmitError> {
        if self.step != WizardStep::Amount {
            return Err(SubmitError::WrongStep);
        }
        if !self.validate_step(WizardStep::Amount) {
            return Err(SubmitError::Validation);
        }
        self.errors.clear(Field::General);

        self.is_loading = true;
        let profile = self.api.get_profile().await;
        self.is_loading = false;

        let profile = match profile {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to load profile for transfer: {}", e);
                let message = user_message(&e);
                self.errors.set(Field::General, message.clone());
                return Err(SubmitError::ProfileUnavailable(message));
            }
        };
        if !profile.can_transfer() {
            info!(user_id = %self.auth.user_id, "Transfer blocked pending KYC");
            let error = SubmitError::KycRequired;
            self.errors.set(Field::General, error.to_string());
            return Err(error);
        }

        let mut pin_state = self.pin_gate.state();
        if pin_state == PinState::Unknown {
            pin_state = self.pin_gate.check_status().await;
        }

        let prompt = match pin_state {
            PinState::Set => PinPrompt::Verify,
            PinState::Unset => PinPrompt::Create,
            PinState::Unknown => {
                let error = PinError::Api("Could not check your transfer PIN. Please try again.".to_string());
                self.errors.set(Field::General, error.to_string());
                return Err(error.into());
            }
        };

        self.pin_input.zeroize();
        self.pin_error = None;
        self.pin_prompt = prompt;
        Ok(prompt)
    }

    /// Confirm the PIN-creation prompt.
    ///
    /// On success the prompt closes and the user has to submit again to reach verification.
    pub async fn confirm_pin_setup(&mut self) -> Result<(), SubmitError> {
        let new_pin = std::mem::take(&mut self.new_pin_input);
        let confirm_pin = std::mem::take(&mut self.confirm_pin_input);

        let result = self.pin_gate.set_pin(&new_pin, &confirm_pin).await;
        match result {
            Ok(()) => {
                self.pin_error = None;
                self.pin_prompt = PinPrompt::Closed;
                Ok(())
            }
            Err(e) => {
                // Keep what was typed so the user can fix it
                self.new_pin_input = new_pin;
                self.confirm_pin_input = confirm_pin;
                self.pin_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Verify the entered PIN and, if accepted, create the transfer.
    ///
    /// The PIN input is cleared on every path. A verified PIN covers this one call only.
    pub async fn process_transfer(&mut self) -> Result<TransferOutcome, SubmitError> {
        if self.pin_prompt != PinPrompt::Verify {
            return Err(SubmitError::PinPromptClosed);
        }
        let details_ok = self.validate_step(WizardStep::Details);
        let amount_ok = self.validate_step(WizardStep::Amount);
        if !details_ok || !amount_ok {
            self.cancel_pin_prompt();
            return Err(SubmitError::Validation);
        }

        let pin = std::mem::take(&mut self.pin_input);
        self.is_loading = true;
        let verification = self.pin_gate.verify_pin(&pin).await;
        drop(pin);

        match verification {
            Ok(v) if v.valid => {}
            Ok(v) => {
                self.is_loading = false;
                let message = v.message.unwrap_or_else(|| INVALID_PIN_MESSAGE.to_string());
                self.pin_error = Some(message.clone());
                return Err(PinError::Rejected(message).into());
            }
            Err(e) => {
                self.is_loading = false;
                self.pin_error = Some(e.to_string());
                return Err(e.into());
            }
        }
        self.pin_error = None;
        self.pin_prompt = PinPrompt::Closed;

        let result = self.create_transfer().await;
        self.is_loading = false;
        result
    }

    async fn create_transfer(&mut self) -> Result<TransferOutcome, SubmitError> {
        let destination = match self.draft.resolve_destination() {
            Ok(destination) => destination,
            Err((field, message)) => {
                self.errors.set(field, message.clone());
                return Err(SubmitError::MissingDestination { field, message });
            }
        };
        let Some(amount) = self.draft.sendable_amount() else {
            self.errors.set(Field::Amount, "Please enter a valid amount");
            return Err(SubmitError::Validation);
        };
        let Some(from_account_id) = self.draft.from_account_id.clone() else {
            self.errors.set(Field::FromAccountId, "Please select an account");
            return Err(SubmitError::Validation);
        };

        let request = TransferRequest::new(from_account_id, &destination, amount, &self.draft);
        info!(
            transfer_type = %request.transfer_type,
            amount = %request.amount,
            "Submitting transfer request"
        );

        match self.api.create_transfer(&request).await {
            Ok(created) => {
                let record = created.transfer_request;
                let outcome = TransferOutcome {
                    reference: record.reference_number.unwrap_or(record.id),
                    status: record.status,
                    amount,
                    currency: request.currency.clone(),
                    transfer_type: request.transfer_type,
                    message: created.message,
                    completion_message: created.completion_message,
                    created_at: record.created_at,
                };
                info!(reference = %outcome.reference, "Transfer request created");

                self.errors = FieldErrors::new();
                self.result = Some(outcome.clone());
                self.step = WizardStep::Result;
                notify_transfer_submitted(self.api.clone(), &self.auth.user_id, &outcome);
                Ok(outcome)
            }
            Err(e) => {
                warn!("Transfer request failed: {}", e);
                Err(self.apply_transfer_error(&e))
            }
        }
    }

    /// Spread a create-transfer failure over the error map
    fn apply_transfer_error(&mut self, error: &ApiError) -> SubmitError {
        if let ApiError::BadRequest { field_errors, .. } = error {
            for (key, message) in field_errors {
                self.errors.set(Field::from_api_key(key), message.clone());
            }
        }
        let general = match error {
            ApiError::BadRequest { message, field_errors }
                if message.is_empty() && !field_errors.is_empty() =>
            {
                SubmitError::Validation.to_string()
            }
            other => user_message(other),
        };
        self.errors.set(Field::General, general.clone());
        SubmitError::Rejected(general)
    }
}
