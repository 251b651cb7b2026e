use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::models::{
    AccountLookupRequest, ApiError, FeeRequest, FeeResponse, LookupResponse, NotificationRequest,
    PinStatusResponse, PinVerifyResponse, RateLimitResponse, RoutingLookupRequest, SetPinRequest,
    TransferCreatedResponse, VerifyPinRequest,
};
use super::BankApi;
use crate::config::PortalConfig;
use crate::models::{Account, TransferRequest, UserProfile};
use crate::utils::errors::{extract_field_errors, extract_server_message};
use crate::utils::throttle_bank_api;

/// Bank API client used by the customer portal
pub struct BankClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

impl BankClient {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client with the default request timeout
    pub fn new(api_token: String, base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(api_token, base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Create a new client whose requests give up after `timeout`
    pub fn with_timeout(
        api_token: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &PortalConfig) -> Result<Self, ApiError> {
        Self::with_timeout(
            config.api_token.clone(),
            config.api_base_url.clone(),
            config.request_timeout,
        )
    }

    /// Create default headers with authorization and a fresh request id
    fn create_headers(&self) -> Result<(HeaderMap, String), ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_token))
            .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);

        let request_id = uuid::Uuid::new_v4().to_string();
        let id_value = HeaderValue::from_str(&request_id)
            .map_err(|e| ApiError::RequestError(format!("Failed to create request id: {}", e)))?;
        headers.insert(HeaderName::from_static("x-request-id"), id_value);

        Ok((headers, request_id))
    }

    fn map_send_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(format!("Request timed out: {}", e))
        } else {
            ApiError::RequestError(format!("Request failed: {}", e))
        }
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let server_message = extract_server_message(&body_text);

        match status_code {
            400 | 422 => ApiError::BadRequest {
                message: server_message.unwrap_or_default(),
                field_errors: extract_field_errors(&body_text),
            },
            // The verify endpoint answers a wrong PIN with 401; keep only the server's wording
            401 => ApiError::Unauthorized(server_message.unwrap_or_default()),
            403 => ApiError::Forbidden(server_message.unwrap_or(body_text)),
            404 => ApiError::NotFound(server_message.unwrap_or(body_text)),
            429 => {
                let retry_after = serde_json::from_str::<RateLimitResponse>(&body_text)
                    .ok()
                    .and_then(|r| r.retry_after)
                    .unwrap_or(1000);
                warn!("Bank API rate limited, retry after {} ms", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code as i32, body_text)
            }
            _ => ApiError::HttpError(status_code as i32, server_message.unwrap_or(body_text)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let (headers, request_id) = self.create_headers()?;

        throttle_bank_api().await;
        debug!(%request_id, "GET {}", path);

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.post(path, body).await?;
        Self::read_json(response).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let (headers, request_id) = self.create_headers()?;

        throttle_bank_api().await;
        debug!(%request_id, "POST {}", path);

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl BankApi for BankClient {
    /// GET /auth/profile
    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.get_json("/auth/profile").await
    }

    /// GET /accounts
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get_json("/accounts").await
    }

    /// GET /transfers/pin/status
    async fn transfer_pin_status(&self) -> Result<PinStatusResponse, ApiError> {
        self.get_json("/transfers/pin/status").await
    }

    /// POST /transfers/pin/set
    async fn set_transfer_pin(&self, request: &SetPinRequest) -> Result<(), ApiError> {
        self.post("/transfers/pin/set", request).await.map(|_| ())
    }

    /// POST /transfers/pin/verify
    ///
    /// A 401 is returned as `ApiError::Unauthorized` carrying the server's message.
    async fn verify_transfer_pin(
        &self,
        request: &VerifyPinRequest,
    ) -> Result<PinVerifyResponse, ApiError> {
        self.post_json("/transfers/pin/verify", request).await
    }

    /// POST /transfers/calculate-fee
    async fn calculate_fee(&self, request: &FeeRequest) -> Result<FeeResponse, ApiError> {
        self.post_json("/transfers/calculate-fee", request).await
    }

    /// POST /transfers/validate-account
    async fn validate_account_number(
        &self,
        request: &AccountLookupRequest,
    ) -> Result<LookupResponse, ApiError> {
        self.post_json("/transfers/validate-account", request).await
    }

    /// POST /transfers/validate-routing
    async fn validate_routing_number(
        &self,
        request: &RoutingLookupRequest,
    ) -> Result<LookupResponse, ApiError> {
        self.post_json("/transfers/validate-routing", request).await
    }

    /// POST /transfers/request
    async fn create_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferCreatedResponse, ApiError> {
        self.post_json("/transfers/request", request).await
    }

    /// POST /notifications
    async fn create_notification(&self, request: &NotificationRequest) -> Result<(), ApiError> {
        self.post("/notifications", request).await.map(|_| ())
    }
}
