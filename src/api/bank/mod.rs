pub mod client;
#[cfg(test)]
pub mod mock;
pub mod models;

use async_trait::async_trait;

use crate::models::{Account, TransferRequest, UserProfile};

pub use client::BankClient;
pub use models::{
    AccountLookupRequest, ApiError, FeeRequest, FeeResponse, LookupResponse, NotificationRequest,
    PinStatusResponse, PinVerifyResponse, RoutingLookupRequest, SetPinRequest,
    TransferCreatedResponse, VerifyPinRequest,
};

/// Everything the transfer flow needs from the bank backend.
///
/// [`BankClient`] is the HTTP implementation; services only ever see this trait.
#[async_trait]
pub trait BankApi: Send + Sync {
    async fn get_profile(&self) -> Result<UserProfile, ApiError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError>;

    async fn transfer_pin_status(&self) -> Result<PinStatusResponse, ApiError>;

    async fn set_transfer_pin(&self, request: &SetPinRequest) -> Result<(), ApiError>;

    async fn verify_transfer_pin(
        &self,
        request: &VerifyPinRequest,
    ) -> Result<PinVerifyResponse, ApiError>;

    async fn calculate_fee(&self, request: &FeeRequest) -> Result<FeeResponse, ApiError>;

    async fn validate_account_number(
        &self,
        request: &AccountLookupRequest,
    ) -> Result<LookupResponse, ApiError>;

    async fn validate_routing_number(
        &self,
        request: &RoutingLookupRequest,
    ) -> Result<LookupResponse, ApiError>;

    async fn create_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferCreatedResponse, ApiError>;

    async fn create_notification(&self, request: &NotificationRequest) -> Result<(), ApiError>;
}
