//! Fee quote models

use rust_decimal::Decimal;

use super::transfer::TransferType;

/// Where a quote came from. A fallback quote is an estimate and is shown as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeSource {
    Backend,
    Fallback { reason: String },
}

/// Fee breakdown for one (amount, transfer type) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeQuote {
    pub amount: Decimal,
    pub transfer_type: TransferType,
    pub base_fee: Decimal,
    pub network_fee: Decimal,
    pub total_fee: Decimal,
    pub total_cost: Decimal,
    pub source: FeeSource,
}

impl FeeQuote {
    /// Build a quote, clamping every component at zero.
    /// `total_fee` defaults to `base_fee + network_fee` when the caller has none.
    pub fn new(
        amount: Decimal,
        transfer_type: TransferType,
        base_fee: Decimal,
        network_fee: Decimal,
        total_fee: Option<Decimal>,
        source: FeeSource,
    ) -> Self {
        let base_fee = base_fee.max(Decimal::ZERO);
        let network_fee = network_fee.max(Decimal::ZERO);
        let total_fee = total_fee
            .unwrap_or_else(|| base_fee.saturating_add(network_fee))
            .max(Decimal::ZERO);
        let amount = amount.max(Decimal::ZERO);

        Self {
            amount,
            transfer_type,
            base_fee,
            network_fee,
            total_fee,
            total_cost: amount.saturating_add(total_fee),
            source,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self.source, FeeSource::Fallback { .. })
    }
}
