//! Payout record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

use super::state::PayoutState;

/// Cash-out request from the API layer.
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub customer_id: i64,
    pub amount: Decimal,
    /// Destination PIX key
    pub pix_key: String,
    /// Client-supplied idempotency key
    pub request_id: String,
}

/// Payout record as stored.
#[derive(Debug, Clone)]
pub struct Payout {
    pub payout_id: i64,
    pub customer_id: i64,
    pub amount: Decimal,
    pub pix_key: String,
    pub request_id: String,
    /// Reservation debit this payout is backed by
    pub debit_tx_id: i64,
    /// Bank correlation id, assigned after the bank accepts the transfer
    pub end_to_end_id: Option<String>,
    pub state: PayoutState,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payout {
    /// Deterministic ledger reference of the reservation debit.
    pub fn debit_reference(request_id: &str) -> String {
        format!("payout:{}", request_id)
    }

    /// Deterministic ledger reference of the compensation credit. One
    /// reference per request id, so a retried failure path can never
    /// double-refund.
    pub fn refund_reference(request_id: &str) -> String {
        format!("payout_refund:{}", request_id)
    }
}

impl fmt::Display for Payout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Payout[{}] customer={} amount={} state={}",
            self.payout_id, self.customer_id, self.amount, self.state
        )
    }
}
