//! Checkout pricing rules.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a client-supplied order total is treated at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderTotalPolicy {
    /// Store the client total as given; a mismatch with the snapshot is only logged.
    #[default]
    Trust,

    /// Recompute from catalog prices plus delivery and reject a mismatch.
    Verify,
}

/// Flat delivery fee waived above a subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPolicy {
    pub fee: u64,
    pub free_threshold: u64,
}

impl DeliveryPolicy {
    pub const DEFAULT_FEE: u64 = 50_000;
    pub const DEFAULT_FREE_THRESHOLD: u64 = 500_000;

    /// Delivery charged for a given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: u64) -> u64 {
        if subtotal > self.free_threshold {
            0
        } else {
            self.fee
        }
    }

    /// Subtotal plus delivery; `None` on overflow.
    #[must_use]
    pub fn total_for(&self, subtotal: u64) -> Option<u64> {
        subtotal.checked_add(self.fee_for(subtotal))
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            fee: Self::DEFAULT_FEE,
            free_threshold: Self::DEFAULT_FREE_THRESHOLD,
        }
    }
}
