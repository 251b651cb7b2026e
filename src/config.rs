//! Runtime configuration read from the environment (and `.env` via dotenv)

use std::time::Duration;

use crate::services::fee_service::FallbackNetworkFee;
use crate::utils::errors::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RPS: usize = 10;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub request_timeout: Duration,
    pub max_requests_per_second: usize,
    pub fallback_network_fee: FallbackNetworkFee,
    /// User the console session acts for; only used for notifications
    pub user_id: String,
}

impl PortalConfig {
    /// Read configuration from the process environment.
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but over an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("BANK_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BANK_API_URL"))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "BANK_API_URL",
                reason: "must start with http:// or https://".to_string(),
            });
        }

        let api_token = lookup("BANK_API_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BANK_API_TOKEN"))?;

        let timeout_secs = match lookup("BANK_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "BANK_API_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let max_requests_per_second = match lookup("BANK_API_MAX_RPS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                key: "BANK_API_MAX_RPS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_RPS,
        };

        let fallback_network_fee = match lookup("FEE_FALLBACK_NETWORK_FEE") {
            Some(raw) => raw
                .parse::<FallbackNetworkFee>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "FEE_FALLBACK_NETWORK_FEE",
                    reason,
                })?,
            None => FallbackNetworkFee::default(),
        };

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            max_requests_per_second,
            fallback_network_fee,
            user_id: lookup("BANK_USER_ID").unwrap_or_else(|| "me".to_string()),
        })
    }
}
