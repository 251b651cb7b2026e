//! Best-effort notifications. Failures are logged and otherwise ignored.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::bank::{BankApi, NotificationRequest};
use crate::models::TransferOutcome;
use crate::utils::format_money;

pub fn transfer_notification(user_id: &str, outcome: &TransferOutcome) -> NotificationRequest {
    NotificationRequest {
        user_id: user_id.to_string(),
        title: "Transfer submitted".to_string(),
        message: format!(
            "Your {} of {} was submitted (reference {}).",
            outcome.transfer_type.title().to_lowercase(),
            format_money(outcome.amount, &outcome.currency),
            outcome.reference
        ),
        kind: "transfer".to_string(),
    }
}

/// Fire and forget. Returns the task handle, or `None` when no runtime is running.
pub fn notify_transfer_submitted(
    api: Arc<dyn BankApi>,
    user_id: &str,
    outcome: &TransferOutcome,
) -> Option<JoinHandle<()>> {
    let request = transfer_notification(user_id, outcome);

    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!("No async runtime available, skipping transfer notification");
        return None;
    };

    Some(runtime.spawn(async move {
        match api.create_notification(&request).await {
            Ok(()) => debug!("Transfer notification created"),
            Err(e) => warn!("Failed to create transfer notification: {}", e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bank::mock::{self, MockBank};
    use crate::api::bank::ApiError;
    use crate::models::TransferType;
    use rust_decimal::Decimal;

    fn outcome() -> TransferOutcome {
        TransferOutcome {
            reference: "tr-9".to_string(),
            status: Some("pending".to_string()),
            amount: Decimal::new(5000, 2),
            currency: "USD".to_string(),
            transfer_type: TransferType::Internal,
            message: None,
            completion_message: None,
            created_at: None,
        }
    }

    #[test]
    fn test_notification_text() {
        let request = transfer_notification("u-1", &outcome());
        assert_eq!(request.user_id, "u-1");
        assert!(request.message.contains("50.00 USD"));
        assert!(request.message.contains("tr-9"));
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let bank = Arc::new(
            MockBank::new().with_notification(Err(ApiError::ServerError(500, "down".into()))),
        );
        let handle = notify_transfer_submitted(bank.clone(), "u-1", &outcome())
            .expect("runtime is running");

        handle.await.expect("task does not panic");
        assert_eq!(bank.calls(mock::NOTIFICATION), 1);
    }
}
