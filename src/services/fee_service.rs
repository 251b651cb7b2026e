//! Fee Estimator - backend quote first, static table when the backend is unreachable

use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::api::bank::{BankApi, FeeRequest};
use crate::models::{FeeQuote, FeeSource, TransferType};

/// Flat fee for domestic external transfers when no quote is available
pub const DOMESTIC_FALLBACK_FEE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Base fee for international wires when no quote is available
pub const INTERNATIONAL_FALLBACK_FEE: Decimal = Decimal::from_parts(45, 0, 0, false, 0);

/// How the fallback path prices the international network fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackNetworkFee {
    /// Same value every time
    Fixed(Decimal),
    /// Uniform draw in `[min, max)` cents; not deterministic
    Sampled { min: Decimal, max: Decimal },
}

impl Default for FallbackNetworkFee {
    fn default() -> Self {
        FallbackNetworkFee::Fixed(Decimal::new(20, 0))
    }
}

impl FromStr for FallbackNetworkFee {
    type Err = String;

    /// `fixed`, `sampled`, or a plain number for a fixed fee
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "fixed" => Ok(FallbackNetworkFee::default()),
            "sampled" | "random" => Ok(FallbackNetworkFee::Sampled {
                min: Decimal::new(10, 0),
                max: Decimal::new(30, 0),
            }),
            other => match Decimal::from_str(other) {
                Ok(fee) if fee >= Decimal::ZERO => Ok(FallbackNetworkFee::Fixed(fee)),
                _ => Err(format!("expected 'fixed', 'sampled' or a non-negative amount, got '{}'", other)),
            },
        }
    }
}

impl FallbackNetworkFee {
    fn draw(&self) -> Decimal {
        match self {
            FallbackNetworkFee::Fixed(fee) => *fee,
            FallbackNetworkFee::Sampled { min, max } => {
                let to_cents = |d: &Decimal| (d.round_dp(2) * Decimal::ONE_HUNDRED).trunc();
                let (lo, hi) = (to_cents(min), to_cents(max));
                let lo: i64 = lo.try_into().unwrap_or(0);
                let hi: i64 = hi.try_into().unwrap_or(lo);
                if hi <= lo {
                    return Decimal::new(lo.max(0), 2);
                }
                let cents = rand::thread_rng().gen_range(lo..hi);
                Decimal::new(cents.max(0), 2)
            }
        }
    }
}

/// Identifies the inputs one quote request was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTicket {
    generation: u64,
    pub amount: Decimal,
    pub transfer_type: TransferType,
}

pub struct FeeEstimator {
    api: Arc<dyn BankApi>,
    fallback_network_fee: FallbackNetworkFee,
    generation: u64,
}

impl FeeEstimator {
    pub fn new(api: Arc<dyn BankApi>, fallback_network_fee: FallbackNetworkFee) -> Self {
        Self {
            api,
            fallback_network_fee,
            generation: 0,
        }
    }

    /// Ask the bank for a quote; fall back to the static table if that fails.
    /// Always returns a quote.
    pub async fn estimate(&self, amount: Decimal, transfer_type: TransferType) -> FeeQuote {
        let request = FeeRequest {
            transfer_type,
            amount,
        };

        match self.api.calculate_fee(&request).await {
            Ok(response) => {
                debug!(
                    "Fee quote for {} {}: base {} total {}",
                    transfer_type, amount, response.base_fee, response.total_fee
                );
                FeeQuote::new(
                    amount,
                    transfer_type,
                    response.base_fee,
                    response.network_fee.unwrap_or(Decimal::ZERO),
                    Some(response.total_fee),
                    FeeSource::Backend,
                )
            }
            Err(e) => {
                warn!("Fee calculation failed for {} transfer, using fallback: {}", transfer_type, e);
                self.fallback_quote(amount, transfer_type, e.to_string())
            }
        }
    }

    /// Static approximation used when the bank cannot quote
    pub fn fallback_quote(
        &self,
        amount: Decimal,
        transfer_type: TransferType,
        reason: String,
    ) -> FeeQuote {
        let (base_fee, network_fee) = match transfer_type {
            TransferType::Internal => (Decimal::ZERO, Decimal::ZERO),
            TransferType::DomesticExternal => (DOMESTIC_FALLBACK_FEE, Decimal::ZERO),
            TransferType::International => {
                (INTERNATIONAL_FALLBACK_FEE, self.fallback_network_fee.draw())
            }
        };

        FeeQuote::new(
            amount,
            transfer_type,
            base_fee,
            network_fee,
            None,
            FeeSource::Fallback { reason },
        )
    }

    /// Start a new request; every older ticket becomes stale
    pub fn begin(&mut self, amount: Decimal, transfer_type: TransferType) -> FeeTicket {
        self.generation += 1;
        FeeTicket {
            generation: self.generation,
            amount,
            transfer_type,
        }
    }

    pub fn is_current(&self, ticket: &FeeTicket) -> bool {
        ticket.generation == self.generation
    }
}
