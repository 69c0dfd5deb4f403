//! Ledger record types.
//!
//! Type and status codes are SMALLINT in PostgreSQL; the enums here are the
//! single source of truth for the numeric mapping.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Ledger transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum TxType {
    /// Inbound PIX deposit (bank webhook)
    PixIn = 1,
    /// Outbound PIX payout reservation
    PixOut = 2,
    /// Conversion record (buy: balance-neutral; sell: BRL credit)
    Conversion = 3,
    /// Internal transfer in
    TransferIn = 4,
    /// Internal transfer out
    TransferOut = 5,
    /// Generic debit
    Debit = 6,
    /// Generic credit (also used for compensations and commissions)
    Credit = 7,
}

impl TxType {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TxType::PixIn),
            2 => Some(TxType::PixOut),
            3 => Some(TxType::Conversion),
            4 => Some(TxType::TransferIn),
            5 => Some(TxType::TransferOut),
            6 => Some(TxType::Debit),
            7 => Some(TxType::Credit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::PixIn => "PIX_IN",
            TxType::PixOut => "PIX_OUT",
            TxType::Conversion => "CONVERSION",
            TxType::TransferIn => "TRANSFER_IN",
            TxType::TransferOut => "TRANSFER_OUT",
            TxType::Debit => "DEBIT",
            TxType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger transaction status
///
/// Entries are never deleted; the only permitted status transition is
/// COMPLETED -> REVERSED when a compensation links back to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum TxStatus {
    Completed = 1,
    Reversed = 2,
}

impl TxStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TxStatus::Completed),
            2 => Some(TxStatus::Reversed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Completed => "COMPLETED",
            TxStatus::Reversed => "REVERSED",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// BRL account owned by one customer.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: i64,
    pub customer_id: i64,
    pub currency: String,
    pub balance: Decimal,
    pub blocked_amount: Decimal,
    pub version: i64,
}

impl Account {
    /// Funds not reserved by an in-flight operation.
    pub fn available(&self) -> Decimal {
        self.balance - self.blocked_amount
    }
}

/// Immutable ledger entry.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub tx_id: i64,
    pub account_id: i64,
    pub tx_type: TxType,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub status: TxStatus,
    pub reference: String,
    pub external_id: Option<String>,
    pub related_tx_id: Option<i64>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// True when the entry changed no balance (buy-flow conversion marker).
    pub fn is_balance_neutral(&self) -> bool {
        self.balance_before == self.balance_after
    }
}
