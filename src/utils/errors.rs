use thiserror::Error;

use crate::api::bank::ApiError;
use crate::models::Field;

pub const KYC_REQUIRED_MESSAGE: &str =
    "Please complete your KYC verification before making transfers.";
pub const INVALID_PIN_MESSAGE: &str = "Invalid PIN";
pub const NO_ACTIVE_ACCOUNTS_MESSAGE: &str = "No active accounts available";

/// Transfer PIN errors. Local ones are raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must be exactly 4 digits")]
    InvalidFormat,
    #[error("PINs do not match")]
    Mismatch,
    /// Server said no; message is the server's own wording when it gave one
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Api(String),
}

/// Why a submit or a transfer attempt stopped
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Transfers can only be submitted from the amount step")]
    WrongStep,
    #[error("Please correct the highlighted fields")]
    Validation,
    #[error("{}", KYC_REQUIRED_MESSAGE)]
    KycRequired,
    #[error("Could not load your profile: {0}")]
    ProfileUnavailable(String),
    #[error("Transfer PIN verification is not open")]
    PinPromptClosed,
    #[error("{0}")]
    Pin(#[from] PinError),
    #[error("{message}")]
    MissingDestination { field: Field, message: String },
    #[error("{0}")]
    Rejected(String),
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Turn a transport error into something that can be shown to the user.
///
/// Server-provided wording wins when the server gave one.
pub fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::BadRequest { message, .. } if !message.is_empty() => message.clone(),
        ApiError::BadRequest { .. } => "The request was rejected. Please check your input.".to_string(),
        ApiError::Unauthorized(msg) if !msg.is_empty() => msg.clone(),
        ApiError::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Forbidden(_) => "You do not have permission to perform this action.".to_string(),
        ApiError::NotFound(_) => "The requested resource was not found.".to_string(),
        ApiError::RateLimited { .. } => {
            "Too many requests. Please wait a moment and try again.".to_string()
        }
        ApiError::ServerError(_, _) => {
            "The bank service is temporarily unavailable. Please try again later.".to_string()
        }
        ApiError::HttpError(code, msg) => {
            if msg.is_empty() {
                format!("Request failed ({})", code)
            } else {
                msg.clone()
            }
        }
        ApiError::RequestError(_) | ApiError::Timeout(_) => {
            "Network error. Please check your connection and try again.".to_string()
        }
        ApiError::DeserializationError(_) => {
            "Unexpected response from the bank service.".to_string()
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
///
/// Looks at `message`, then `error`, then `detail`. Returns `None` for non-JSON
/// bodies and for bodies without any of those keys.
pub fn extract_server_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| json.get(*key))
        .find_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Pull `{"errors": {"field": "msg" | ["msg", ...]}}` out of a JSON error body
pub fn extract_field_errors(body: &str) -> Vec<(String, String)> {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return Vec::new();
    };
    let Some(map) = json.get("errors").and_then(|v| v.as_object()) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let message = match value {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(items) => {
                    items.iter().find_map(|i| i.as_str()).map(str::to_string)
                }
                _ => None,
            }?;
            Some((key.clone(), message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_server_message_prefers_message_key() {
        let body = r#"{"error": "invalid_pin", "message": "Incorrect PIN. 2 attempts left."}"#;
        assert_eq!(
            extract_server_message(body).as_deref(),
            Some("Incorrect PIN. 2 attempts left.")
        );
        assert_eq!(extract_server_message(r#"{"error": "Nope"}"#).as_deref(), Some("Nope"));
        assert_eq!(extract_server_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_server_message(r#"{"message": "  "}"#), None);
    }

    #[test]
    fn test_extract_field_errors_accepts_strings_and_lists() {
        let body = r#"{"errors": {"amount": ["Insufficient funds", "ignored"], "to_iban": "Invalid IBAN", "x": 3}}"#;
        let mut errors = extract_field_errors(body);
        errors.sort();
        assert_eq!(
            errors,
            vec![
                ("amount".to_string(), "Insufficient funds".to_string()),
                ("to_iban".to_string(), "Invalid IBAN".to_string()),
            ]
        );
        assert!(extract_field_errors("not json").is_empty());
    }

    #[test]
    fn test_user_message_never_leaks_transport_details() {
        let msg = user_message(&ApiError::RequestError("tcp connect error: 10.0.0.1:443".into()));
        assert!(!msg.contains("10.0.0.1"));
        let msg = user_message(&ApiError::ServerError(502, "<html>".into()));
        assert!(!msg.contains("html"));
        assert_eq!(
            user_message(&ApiError::Unauthorized("Incorrect PIN".into())),
            "Incorrect PIN"
        );
    }
}
