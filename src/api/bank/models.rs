use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::models::{opt_string_or_number, string_or_number, TransferType};

/// GET /transfers/pin/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinStatusResponse {
    #[serde(alias = "has_pin", rename = "hasPin")]
    pub has_pin: bool,
}

/// POST /transfers/pin/set. Both PIN copies are wiped on drop.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct SetPinRequest {
    pub pin: String,
    pub confirm_pin: String,
}

/// POST /transfers/pin/verify. The PIN is wiped on drop.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct VerifyPinRequest {
    pub pin: String,
}

impl std::fmt::Debug for SetPinRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SetPinRequest { pin: ****, confirm_pin: **** }")
    }
}

impl std::fmt::Debug for VerifyPinRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VerifyPinRequest { pin: **** }")
    }
}

/// Response from the verify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinVerifyResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /transfers/calculate-fee
#[derive(Debug, Clone, Serialize)]
pub struct FeeRequest {
    pub transfer_type: TransferType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Fee quote as returned by the bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeResponse {
    pub base_fee: Decimal,
    #[serde(default)]
    pub network_fee: Option<Decimal>,
    pub total_fee: Decimal,
}

/// POST /transfers/validate-account
#[derive(Debug, Clone, Serialize)]
pub struct AccountLookupRequest {
    pub account_number: String,
    pub transfer_type: TransferType,
}

/// POST /transfers/validate-routing
#[derive(Debug, Clone, Serialize)]
pub struct RoutingLookupRequest {
    pub routing_number: String,
}

/// Shared response shape of both lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
}

/// The created transfer record inside a create-transfer response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// POST /transfers/request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCreatedResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub transfer_request: TransferRecord,
    #[serde(default)]
    pub completion_message: Option<String>,
}

/// POST /notifications
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 429 Rate limit response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub retry_after: Option<i64>,
}

/// Comprehensive error type for bank API operations
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 / 422, with any per-field messages the server sent
    BadRequest {
        message: String,
        field_errors: Vec<(String, String)>,
    },
    /// 401 Unauthorized (also the "wrong PIN" answer of the verify endpoint)
    Unauthorized(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 429 Too Many Requests
    RateLimited { retry_after: i64 },
    /// 5xx Server Error
    ServerError(i32, String),
    /// Other HTTP errors
    HttpError(i32, String),
    /// Network/request error
    RequestError(String),
    /// Request did not complete within the configured timeout
    Timeout(String),
    /// Deserialization error
    DeserializationError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest { message, field_errors } => {
                write!(f, "Bad Request: {}", message)?;
                if !field_errors.is_empty() {
                    write!(f, " ({} field errors)", field_errors.len())?;
                }
                Ok(())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::RateLimited { retry_after } => {
                write!(f, "Rate Limited. Retry after {} ms", retry_after)
            }
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
