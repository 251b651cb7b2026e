//! Scripted in-memory `BankApi` for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::models::{
    AccountLookupRequest, ApiError, FeeRequest, FeeResponse, LookupResponse, NotificationRequest,
    PinStatusResponse, PinVerifyResponse, RoutingLookupRequest, SetPinRequest, TransferCreatedResponse,
    TransferRecord, VerifyPinRequest,
};
use super::BankApi;
use crate::models::{Account, AccountStatus, KycStatus, TransferRequest, UserProfile};

pub const PROFILE: &str = "get_profile";
pub const ACCOUNTS: &str = "list_accounts";
pub const PIN_STATUS: &str = "transfer_pin_status";
pub const SET_PIN: &str = "set_transfer_pin";
pub const VERIFY_PIN: &str = "verify_transfer_pin";
pub const FEE: &str = "calculate_fee";
pub const VALIDATE_ACCOUNT: &str = "validate_account_number";
pub const VALIDATE_ROUTING: &str = "validate_routing_number";
pub const CREATE_TRANSFER: &str = "create_transfer";
pub const NOTIFICATION: &str = "create_notification";

/// Every endpoint returns a clone of its scripted result and bumps a call counter
pub struct MockBank {
    profile: Mutex<Result<UserProfile, ApiError>>,
    accounts: Mutex<Result<Vec<Account>, ApiError>>,
    pin_status: Mutex<Result<PinStatusResponse, ApiError>>,
    set_pin: Mutex<Result<(), ApiError>>,
    verify: Mutex<Result<PinVerifyResponse, ApiError>>,
    fee: Mutex<Result<FeeResponse, ApiError>>,
    account_lookup: Mutex<Result<LookupResponse, ApiError>>,
    routing_lookup: Mutex<Result<LookupResponse, ApiError>>,
    transfer: Mutex<Result<TransferCreatedResponse, ApiError>>,
    notification: Mutex<Result<(), ApiError>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    pub last_transfer: Mutex<Option<TransferRequest>>,
    pub last_verified_pin: Mutex<Option<String>>,
    pub last_fee_request: Mutex<Option<(Decimal, crate::models::TransferType)>>,
}

pub fn account(id: &str, balance: i64, status: AccountStatus) -> Account {
    Account {
        id: id.to_string(),
        account_number: format!("10020030{}", id),
        account_name: Some(format!("Account {}", id)),
        account_type: Some("checking".to_string()),
        balance: Decimal::new(balance, 0),
        currency: "USD".to_string(),
        status,
    }
}

pub fn created(id: &str) -> TransferCreatedResponse {
    TransferCreatedResponse {
        message: Some("Transfer request submitted".to_string()),
        transfer_request: TransferRecord {
            id: id.to_string(),
            reference_number: None,
            status: Some("pending".to_string()),
            created_at: None,
        },
        completion_message: Some("Your transfer is being processed".to_string()),
    }
}

impl MockBank {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(Ok(UserProfile {
                email: Some("jane@example.com".to_string()),
                kyc_status: KycStatus::Approved,
                is_verified: true,
            })),
            accounts: Mutex::new(Ok(Vec::new())),
            pin_status: Mutex::new(Ok(PinStatusResponse { has_pin: true })),
            set_pin: Mutex::new(Ok(())),
            verify: Mutex::new(Ok(PinVerifyResponse {
                valid: true,
                message: None,
            })),
            fee: Mutex::new(Err(ApiError::ServerError(503, "unavailable".to_string()))),
            account_lookup: Mutex::new(Ok(LookupResponse {
                valid: true,
                message: None,
                bank_name: None,
                account_name: None,
            })),
            routing_lookup: Mutex::new(Ok(LookupResponse {
                valid: true,
                message: None,
                bank_name: None,
                account_name: None,
            })),
            transfer: Mutex::new(Ok(created("tr-1"))),
            notification: Mutex::new(Ok(())),
            calls: Mutex::new(HashMap::new()),
            last_transfer: Mutex::new(None),
            last_verified_pin: Mutex::new(None),
            last_fee_request: Mutex::new(None),
        }
    }

    pub fn with_profile(self, kyc_status: KycStatus, is_verified: bool) -> Self {
        *self.profile.lock().unwrap() = Ok(UserProfile {
            email: None,
            kyc_status,
            is_verified,
        });
        self
    }

    pub fn with_accounts(self, accounts: Vec<Account>) -> Self {
        *self.accounts.lock().unwrap() = Ok(accounts);
        self
    }

    pub fn with_accounts_error(self, error: ApiError) -> Self {
        *self.accounts.lock().unwrap() = Err(error);
        self
    }

    pub fn with_pin_status(self, has_pin: bool) -> Self {
        *self.pin_status.lock().unwrap() = Ok(PinStatusResponse { has_pin });
        self
    }

    pub fn with_pin_status_error(self, error: ApiError) -> Self {
        *self.pin_status.lock().unwrap() = Err(error);
        self
    }

    pub fn with_set_pin(self, result: Result<(), ApiError>) -> Self {
        *self.set_pin.lock().unwrap() = result;
        self
    }

    pub fn with_verify(self, result: Result<PinVerifyResponse, ApiError>) -> Self {
        *self.verify.lock().unwrap() = result;
        self
    }

    pub fn with_fee(self, result: Result<FeeResponse, ApiError>) -> Self {
        *self.fee.lock().unwrap() = result;
        self
    }

    pub fn with_account_lookup(self, result: Result<LookupResponse, ApiError>) -> Self {
        *self.account_lookup.lock().unwrap() = result;
        self
    }

    pub fn with_routing_lookup(self, result: Result<LookupResponse, ApiError>) -> Self {
        *self.routing_lookup.lock().unwrap() = result;
        self
    }

    pub fn with_transfer(self, result: Result<TransferCreatedResponse, ApiError>) -> Self {
        *self.transfer.lock().unwrap() = result;
        self
    }

    pub fn with_notification(self, result: Result<(), ApiError>) -> Self {
        *self.notification.lock().unwrap() = result;
        self
    }

    /// Replace the fee result on a shared mock
    pub fn set_fee(&self, result: Result<FeeResponse, ApiError>) {
        *self.fee.lock().unwrap() = result;
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }
}

#[async_trait]
impl BankApi for MockBank {
    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.record(PROFILE);
        self.profile.lock().unwrap().clone()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.record(ACCOUNTS);
        self.accounts.lock().unwrap().clone()
    }

    async fn transfer_pin_status(&self) -> Result<PinStatusResponse, ApiError> {
        self.record(PIN_STATUS);
        self.pin_status.lock().unwrap().clone()
    }

    async fn set_transfer_pin(&self, _request: &SetPinRequest) -> Result<(), ApiError> {
        self.record(SET_PIN);
        self.set_pin.lock().unwrap().clone()
    }

    async fn verify_transfer_pin(
        &self,
        request: &VerifyPinRequest,
    ) -> Result<PinVerifyResponse, ApiError> {
        self.record(VERIFY_PIN);
        *self.last_verified_pin.lock().unwrap() = Some(request.pin.clone());
        self.verify.lock().unwrap().clone()
    }

    async fn calculate_fee(&self, request: &FeeRequest) -> Result<FeeResponse, ApiError> {
        self.record(FEE);
        *self.last_fee_request.lock().unwrap() = Some((request.amount, request.transfer_type));
        self.fee.lock().unwrap().clone()
    }

    async fn validate_account_number(
        &self,
        _request: &AccountLookupRequest,
    ) -> Result<LookupResponse, ApiError> {
        self.record(VALIDATE_ACCOUNT);
        self.account_lookup.lock().unwrap().clone()
    }

    async fn validate_routing_number(
        &self,
        _request: &RoutingLookupRequest,
    ) -> Result<LookupResponse, ApiError> {
        self.record(VALIDATE_ROUTING);
        self.routing_lookup.lock().unwrap().clone()
    }

    async fn create_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferCreatedResponse, ApiError> {
        self.record(CREATE_TRANSFER);
        *self.last_transfer.lock().unwrap() = Some(request.clone());
        self.transfer.lock().unwrap().clone()
    }

    async fn create_notification(&self, _request: &NotificationRequest) -> Result<(), ApiError> {
        self.record(NOTIFICATION);
        self.notification.lock().unwrap().clone()
    }
}
