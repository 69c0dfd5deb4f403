//! PIX bank rail contract.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Mutex;

use super::RailError;

/// Synchronous answer of the bank rail to a transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankTransferStatus {
    /// Accepted for processing; final status arrives via webhook
    Accepted,
    /// Settled inline
    Confirmed,
}

/// Result of a PIX transfer request.
#[derive(Debug, Clone)]
pub struct BankTransfer {
    /// Bank-assigned end-to-end correlation id
    pub end_to_end_id: String,
    pub status: BankTransferStatus,
}

/// Terminal payout status delivered by the bank webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixPayoutStatus {
    Confirmed,
    Failed,
    Canceled,
}

impl PixPayoutStatus {
    /// Map a webhook status string. Unknown statuses return `None`; the
    /// handler logs and ignores them rather than guessing a transition.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CONFIRMED" | "LIQUIDATED" | "SETTLED" => Some(PixPayoutStatus::Confirmed),
            "FAILED" | "REJECTED" | "RETURNED" => Some(PixPayoutStatus::Failed),
            "CANCELED" | "CANCELLED" => Some(PixPayoutStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PixPayoutStatus::Confirmed => "CONFIRMED",
            PixPayoutStatus::Failed => "FAILED",
            PixPayoutStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for PixPayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bank rail adapter.
#[async_trait]
pub trait BankRail: Send + Sync {
    /// Send a PIX transfer to `destination_key`.
    ///
    /// Once this returns `Ok`, the money is committed on the bank side and
    /// cannot be recalled by the engine.
    async fn send_transfer(
        &self,
        amount: Decimal,
        destination_key: &str,
    ) -> Result<BankTransfer, RailError>;

    /// Current balance of the platform's bank account.
    async fn get_balance(&self) -> Result<Decimal, RailError>;
}

/// Record of a transfer the mock accepted.
#[derive(Debug, Clone)]
pub struct SentTransfer {
    pub end_to_end_id: String,
    pub amount: Decimal,
    pub destination_key: String,
}

/// Scriptable in-memory bank rail.
#[derive(Default)]
pub struct MockBankRail {
    sent: Mutex<Vec<SentTransfer>>,
    next_error: Mutex<Option<RailError>>,
    confirm_inline: Mutex<bool>,
    balance: Mutex<Decimal>,
}

impl MockBankRail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `send_transfer` with the given error.
    pub fn fail_next(&self, error: RailError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Make subsequent transfers settle inline (status Confirmed).
    pub fn set_confirm_inline(&self, inline: bool) {
        *self.confirm_inline.lock().unwrap() = inline;
    }

    pub fn set_balance(&self, balance: Decimal) {
        *self.balance.lock().unwrap() = balance;
    }

    pub fn sent_transfers(&self) -> Vec<SentTransfer> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl BankRail for MockBankRail {
    async fn send_transfer(
        &self,
        amount: Decimal,
        destination_key: &str,
    ) -> Result<BankTransfer, RailError> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        let end_to_end_id = format!("E{}", uuid::Uuid::new_v4().simple());
        self.sent.lock().unwrap().push(SentTransfer {
            end_to_end_id: end_to_end_id.clone(),
            amount,
            destination_key: destination_key.to_string(),
        });

        let status = if *self.confirm_inline.lock().unwrap() {
            BankTransferStatus::Confirmed
        } else {
            BankTransferStatus::Accepted
        };

        Ok(BankTransfer {
            end_to_end_id,
            status,
        })
    }

    async fn get_balance(&self) -> Result<Decimal, RailError> {
        Ok(*self.balance.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_status_parsing() {
        assert_eq!(PixPayoutStatus::parse("CONFIRMED"), Some(PixPayoutStatus::Confirmed));
        assert_eq!(PixPayoutStatus::parse("liquidated"), Some(PixPayoutStatus::Confirmed));
        assert_eq!(PixPayoutStatus::parse("FAILED"), Some(PixPayoutStatus::Failed));
        assert_eq!(PixPayoutStatus::parse("returned"), Some(PixPayoutStatus::Failed));
        assert_eq!(PixPayoutStatus::parse("CANCELLED"), Some(PixPayoutStatus::Canceled));
        assert_eq!(PixPayoutStatus::parse("IN_FLIGHT"), None);
    }

    #[tokio::test]
    async fn mock_records_transfers_and_scripts_failures() {
        let bank = MockBankRail::new();

        let transfer = bank
            .send_transfer(Decimal::new(5_000, 2), "customer@pix")
            .await
            .unwrap();
        assert!(transfer.end_to_end_id.starts_with('E'));
        assert_eq!(transfer.status, BankTransferStatus::Accepted);
        assert_eq!(bank.sent_count(), 1);

        bank.fail_next(RailError::Rejected("insufficient funds".into()));
        let result = bank.send_transfer(Decimal::ONE, "customer@pix").await;
        assert!(matches!(result, Err(RailError::Rejected(_))));
        // The scripted error applies exactly once
        assert!(bank.send_transfer(Decimal::ONE, "customer@pix").await.is_ok());
    }

    #[tokio::test]
    async fn mock_inline_confirmation() {
        let bank = MockBankRail::new();
        bank.set_confirm_inline(true);
        let transfer = bank.send_transfer(Decimal::ONE, "k").await.unwrap();
        assert_eq!(transfer.status, BankTransferStatus::Confirmed);
    }
}
