pub mod account_service;
pub mod fee_service;
pub mod lookup_service;
pub mod notification_service;
pub mod pin_service;
pub mod transfer_service;

pub use transfer_service::TransferWizard;
