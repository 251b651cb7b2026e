//! Transfer draft, destination and request models

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{Field, FieldErrors};

/// Kind of transfer; decides which destination fields are required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    #[default]
    Internal,
    DomesticExternal,
    International,
}

impl TransferType {
    pub const ALL: [TransferType; 3] = [
        TransferType::Internal,
        TransferType::DomesticExternal,
        TransferType::International,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Internal => "internal",
            TransferType::DomesticExternal => "domestic_external",
            TransferType::International => "international",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TransferType::Internal => "Internal transfer",
            TransferType::DomesticExternal => "Domestic transfer",
            TransferType::International => "International wire",
        }
    }

    /// Destination fields that must be filled in on the details step
    pub fn required_destination_fields(&self) -> &'static [Field] {
        match self {
            TransferType::Internal => &[Field::ToAccountNumber],
            TransferType::DomesticExternal => &[
                Field::ToAccountNumber,
                Field::ToRoutingNumber,
                Field::ToBankName,
            ],
            TransferType::International => &[
                Field::ToSwiftCode,
                Field::ToBankName,
                Field::ToIban,
                Field::ToBankCountry,
                Field::BeneficiaryAddress,
            ],
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(TransferType::Internal),
            "domestic_external" | "domestic" | "external" => Ok(TransferType::DomesticExternal),
            "international" | "wire" | "intl" => Ok(TransferType::International),
            other => Err(format!("Unknown transfer type '{}'", other)),
        }
    }
}

/// Wizard position. Steps are numbered 1 to 4 for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    SelectType,
    Details,
    Amount,
    Result,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectType => 1,
            WizardStep::Details => 2,
            WizardStep::Amount => 3,
            WizardStep::Result => 4,
        }
    }

    /// Clamped conversion from a step number
    pub fn from_number(n: u8) -> Self {
        match n {
            0 | 1 => WizardStep::SelectType,
            2 => WizardStep::Details,
            3 => WizardStep::Amount,
            _ => WizardStep::Result,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Self {
        Self::from_number(self.number() - 1)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::SelectType => "Transfer type",
            WizardStep::Details => "Recipient details",
            WizardStep::Amount => "Amount",
            WizardStep::Result => "Result",
        }
    }
}

/// Raw destination inputs. All of them are kept while the user switches transfer types;
/// [`TransferDraft::resolve_destination`] picks the ones that apply.
#[derive(Debug, Clone, Default)]
pub struct DestinationFields {
    pub to_account_number: String,
    pub to_routing_number: String,
    pub to_bank_name: String,
    pub to_swift_code: String,
    pub to_iban: String,
    pub to_bank_country: String,
    pub beneficiary_address: String,
}

/// Destination resolved for the selected transfer type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Internal {
        account_number: String,
    },
    DomesticExternal {
        account_number: String,
        routing_number: String,
        bank_name: String,
    },
    International {
        iban: String,
        swift_code: String,
        bank_name: String,
        bank_country: String,
        beneficiary_address: String,
    },
}

impl Destination {
    /// Value sent as `to_account_number`; the IBAN for international wires
    pub fn account_number(&self) -> &str {
        match self {
            Destination::Internal { account_number }
            | Destination::DomesticExternal { account_number, .. } => account_number,
            Destination::International { iban, .. } => iban,
        }
    }
}

/// Largest amount a single transfer may carry (999,999,999.99)
pub const MAX_TRANSFER_AMOUNT: Decimal = Decimal::from_parts(1_215_752_191, 23, 0, false, 2);

/// Amounts are sent as JSON numbers; within this range and at cent precision they
/// survive the trip through `f64` unchanged.
fn amount_problem(amount: Decimal) -> Option<&'static str> {
    if amount <= Decimal::ZERO {
        Some("Amount must be greater than 0")
    } else if amount > MAX_TRANSFER_AMOUNT {
        Some("Amount cannot exceed 999,999,999.99")
    } else if amount.normalize().scale() > 2 {
        Some("Amount can have at most 2 decimal places")
    } else {
        None
    }
}

/// Form state owned by the wizard for one session
#[derive(Debug, Clone)]
pub struct TransferDraft {
    pub transfer_type: TransferType,
    pub from_account_id: Option<String>,
    pub recipient_name: String,
    pub destination: DestinationFields,
    /// Kept as typed so that non-numeric input can be reported
    pub amount: String,
    pub currency: String,
    pub description: String,
}

impl Default for TransferDraft {
    fn default() -> Self {
        Self {
            transfer_type: TransferType::default(),
            from_account_id: None,
            recipient_name: String::new(),
            destination: DestinationFields::default(),
            amount: String::new(),
            currency: "USD".to_string(),
            description: String::new(),
        }
    }
}

impl TransferDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FromAccountId => self.from_account_id.as_deref().unwrap_or(""),
            Field::RecipientName => &self.recipient_name,
            Field::ToAccountNumber => &self.destination.to_account_number,
            Field::ToRoutingNumber => &self.destination.to_routing_number,
            Field::ToBankName => &self.destination.to_bank_name,
            Field::ToSwiftCode => &self.destination.to_swift_code,
            Field::ToIban => &self.destination.to_iban,
            Field::ToBankCountry => &self.destination.to_bank_country,
            Field::BeneficiaryAddress => &self.destination.beneficiary_address,
            Field::Amount => &self.amount,
            Field::Description => &self.description,
            Field::General => "",
        }
    }

    /// Write one field. `General` is not an input and is ignored.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FromAccountId => {
                let trimmed = value.trim();
                self.from_account_id = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
            Field::RecipientName => self.recipient_name = value,
            Field::ToAccountNumber => self.destination.to_account_number = value,
            Field::ToRoutingNumber => self.destination.to_routing_number = value,
            Field::ToBankName => self.destination.to_bank_name = value,
            Field::ToSwiftCode => self.destination.to_swift_code = value,
            Field::ToIban => self.destination.to_iban = value,
            Field::ToBankCountry => self.destination.to_bank_country = value,
            Field::BeneficiaryAddress => self.destination.beneficiary_address = value,
            Field::Amount => self.amount = value,
            Field::Description => self.description = value,
            Field::General => {}
        }
    }

    /// Parsed amount, `None` when empty or not a number
    pub fn parsed_amount(&self) -> Option<Decimal> {
        let raw = self.amount.trim().trim_start_matches('$').replace(',', "");
        if raw.is_empty() {
            return None;
        }
        Decimal::from_str(&raw).ok()
    }

    /// Parsed amount if it is one that can be sent: positive, at most
    /// [`MAX_TRANSFER_AMOUNT`] and no finer than cents
    pub fn sendable_amount(&self) -> Option<Decimal> {
        self.parsed_amount().filter(|amount| amount_problem(*amount).is_none())
    }

    /// Required-field check for the recipient details step
    pub fn validate_details(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.value(Field::FromAccountId).trim().is_empty() {
            errors.set(Field::FromAccountId, "Please select an account");
        }
        if self.recipient_name.trim().is_empty() {
            errors.set(Field::RecipientName, "Recipient name is required");
        }
        for &field in self.transfer_type.required_destination_fields() {
            if self.value(field).trim().is_empty() {
                errors.set(field, format!("{} is required", field.label()));
            }
        }

        errors
    }

    /// Amount and description check for the amount step
    pub fn validate_amount(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.amount.trim().is_empty() {
            errors.set(Field::Amount, "Amount is required");
        } else {
            match self.parsed_amount() {
                None => errors.set(Field::Amount, "Please enter a valid amount"),
                Some(amount) => {
                    if let Some(problem) = amount_problem(amount) {
                        errors.set(Field::Amount, problem);
                    }
                }
            }
        }
        if self.description.trim().is_empty() {
            errors.set(Field::Description, "Description is required");
        }

        errors
    }

    /// Pick the destination for the current transfer type.
    ///
    /// Only the resolved account number is checked here; the rest was covered by
    /// [`validate_details`](Self::validate_details). The error names the missing field.
    pub fn resolve_destination(&self) -> Result<Destination, (Field, String)> {
        let d = &self.destination;
        let (field, resolved) = match self.transfer_type {
            TransferType::International => (Field::ToIban, d.to_iban.trim()),
            _ => (Field::ToAccountNumber, d.to_account_number.trim()),
        };
        if resolved.is_empty() {
            return Err((
                field,
                format!(
                    "{} is required for {} transfers",
                    field.label(),
                    self.transfer_type.title().to_lowercase()
                ),
            ));
        }

        Ok(match self.transfer_type {
            TransferType::Internal => Destination::Internal {
                account_number: resolved.to_string(),
            },
            TransferType::DomesticExternal => Destination::DomesticExternal {
                account_number: resolved.to_string(),
                routing_number: d.to_routing_number.trim().to_string(),
                bank_name: d.to_bank_name.trim().to_string(),
            },
            TransferType::International => Destination::International {
                iban: resolved.to_string(),
                swift_code: d.to_swift_code.trim().to_uppercase(),
                bank_name: d.to_bank_name.trim().to_string(),
                bank_country: d.to_bank_country.trim().to_string(),
                beneficiary_address: d.beneficiary_address.trim().to_string(),
            },
        })
    }
}

/// Body of the create-transfer call
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub transfer_type: TransferType,
    pub description: String,
    pub recipient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_routing_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_swift_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bank_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_address: Option<String>,
}

impl TransferRequest {
    pub fn new(
        from_account_id: String,
        destination: &Destination,
        amount: Decimal,
        draft: &TransferDraft,
    ) -> Self {
        let mut request = Self {
            from_account_id,
            to_account_number: destination.account_number().to_string(),
            amount,
            currency: draft.currency.clone(),
            transfer_type: draft.transfer_type,
            description: draft.description.trim().to_string(),
            recipient_name: draft.recipient_name.trim().to_string(),
            to_routing_number: None,
            to_bank_name: None,
            to_swift_code: None,
            to_iban: None,
            to_bank_country: None,
            beneficiary_address: None,
        };

        match destination {
            Destination::Internal { .. } => {}
            Destination::DomesticExternal {
                routing_number,
                bank_name,
                ..
            } => {
                request.to_routing_number = Some(routing_number.clone());
                request.to_bank_name = Some(bank_name.clone());
            }
            Destination::International {
                iban,
                swift_code,
                bank_name,
                bank_country,
                beneficiary_address,
            } => {
                request.to_iban = Some(iban.clone());
                request.to_swift_code = Some(swift_code.clone());
                request.to_bank_name = Some(bank_name.clone());
                request.to_bank_country = Some(bank_country.clone());
                request.beneficiary_address = Some(beneficiary_address.clone());
            }
        }

        request
    }
}

/// What the wizard keeps after a successful transfer, for the result step
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub reference: String,
    pub status: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub transfer_type: TransferType,
    pub message: Option<String>,
    pub completion_message: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
