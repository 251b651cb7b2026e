//! Form fields and the per-field error map shared by every validation path

use std::collections::BTreeMap;
use std::fmt;

/// Every input the transfer form exposes, plus `General` for banner-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FromAccountId,
    RecipientName,
    ToAccountNumber,
    ToRoutingNumber,
    ToBankName,
    ToSwiftCode,
    ToIban,
    ToBankCountry,
    BeneficiaryAddress,
    Amount,
    Description,
    General,
}

impl Field {
    /// Key used by the bank API for this field
    pub fn api_key(&self) -> &'static str {
        match self {
            Field::FromAccountId => "from_account_id",
            Field::RecipientName => "recipient_name",
            Field::ToAccountNumber => "to_account_number",
            Field::ToRoutingNumber => "to_routing_number",
            Field::ToBankName => "to_bank_name",
            Field::ToSwiftCode => "to_swift_code",
            Field::ToIban => "to_iban",
            Field::ToBankCountry => "to_bank_country",
            Field::BeneficiaryAddress => "beneficiary_address",
            Field::Amount => "amount",
            Field::Description => "description",
            Field::General => "general",
        }
    }

    /// Map a server-side field key back onto a form field.
    /// Keys the form does not know about land on `General`.
    pub fn from_api_key(key: &str) -> Field {
        match key {
            "from_account_id" | "from_account" => Field::FromAccountId,
            "recipient_name" => Field::RecipientName,
            "to_account_number" | "to_account" => Field::ToAccountNumber,
            "to_routing_number" | "routing_number" => Field::ToRoutingNumber,
            "to_bank_name" | "bank_name" => Field::ToBankName,
            "to_swift_code" | "swift_code" => Field::ToSwiftCode,
            "to_iban" | "iban" => Field::ToIban,
            "to_bank_country" | "bank_country" => Field::ToBankCountry,
            "beneficiary_address" => Field::BeneficiaryAddress,
            "amount" => Field::Amount,
            "description" => Field::Description,
            _ => Field::General,
        }
    }

    /// Human label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::FromAccountId => "Source account",
            Field::RecipientName => "Recipient name",
            Field::ToAccountNumber => "Account number",
            Field::ToRoutingNumber => "Routing number",
            Field::ToBankName => "Bank name",
            Field::ToSwiftCode => "SWIFT code",
            Field::ToIban => "IBAN",
            Field::ToBankCountry => "Bank country",
            Field::BeneficiaryAddress => "Beneficiary address",
            Field::Amount => "Amount",
            Field::Description => "Description",
            Field::General => "General",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_key())
    }
}

/// Error messages keyed by field.
///
/// Writers only ever touch their own key, so two validations landing in any order
/// leave each other's messages intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Overwrite the given fields with `other`'s messages, leaving everything else alone
    pub fn merge(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    /// Drop every field-level error while keeping errors for fields outside `fields`
    pub fn clear_all(&mut self, fields: &[Field]) {
        for field in fields {
            self.errors.remove(field);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}
