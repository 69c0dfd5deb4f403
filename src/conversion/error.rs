//! Conversion error types.

use std::fmt;
use thiserror::Error;

use super::state::ConversionState;
use crate::ledger::LedgerError;
use crate::money::MoneyError;
use crate::wallet::WalletError;

/// Which step of a conversion failed.
///
/// Stages after `BankTransfer` sit past the point of no return for the buy
/// flow: the customer's BRL has already moved over the bank rail, so a
/// failure there is persisted as a stuck record for the operator, never
/// auto-reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Validation,
    BankTransfer,
    ExchangeBuy,
    ExchangeWithdraw,
    ChainTransfer,
    ExchangeSell,
    LedgerWrite,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Validation => "validation",
            FailureStage::BankTransfer => "bank_transfer",
            FailureStage::ExchangeBuy => "exchange_buy",
            FailureStage::ExchangeWithdraw => "exchange_withdraw",
            FailureStage::ChainTransfer => "chain_transfer",
            FailureStage::ExchangeSell => "exchange_sell",
            FailureStage::LedgerWrite => "ledger_write",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "validation" => Some(FailureStage::Validation),
            "bank_transfer" => Some(FailureStage::BankTransfer),
            "exchange_buy" => Some(FailureStage::ExchangeBuy),
            "exchange_withdraw" => Some(FailureStage::ExchangeWithdraw),
            "chain_transfer" => Some(FailureStage::ChainTransfer),
            "exchange_sell" => Some(FailureStage::ExchangeSell),
            "ledger_write" => Some(FailureStage::LedgerWrite),
            _ => None,
        }
    }

    /// True when money already left over an external rail before this stage,
    /// so failing here leaves a stuck record requiring operator action.
    pub fn is_post_commitment(&self) -> bool {
        matches!(
            self,
            FailureStage::ExchangeBuy
                | FailureStage::ExchangeWithdraw
                | FailureStage::ChainTransfer
                | FailureStage::ExchangeSell
                | FailureStage::LedgerWrite
        )
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ConversionError {
    // === Validation (rejected before any external effect) ===
    #[error("Amount below minimum of {minimum} BRL")]
    BelowMinimum { minimum: rust_decimal::Decimal },

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Account not found for customer {0}")]
    AccountNotFound(i64),

    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("No exchange deposit address configured for {0}")]
    NoDepositAddress(crate::rails::Network),

    #[error("No chain client wired for {0}")]
    UnsupportedNetwork(crate::rails::Network),

    /// Transient rail failure; the conversion state is left untouched and
    /// the poller retries on a later tick.
    #[error(transparent)]
    Rail(#[from] crate::rails::RailError),

    // === Flow failures (carry the stage that failed) ===
    #[error("Conversion failed at {stage}: {message}")]
    Stage {
        stage: FailureStage,
        message: String,
    },

    // === State machine ===
    #[error("Conversion not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: ConversionState,
        to: ConversionState,
    },

    // === System ===
    #[error(transparent)]
    Ledger(LedgerError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ConversionError {
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::BelowMinimum { .. } => "BELOW_MINIMUM",
            ConversionError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ConversionError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            ConversionError::InvalidAmount(_) => "INVALID_AMOUNT",
            ConversionError::Wallet(e) => e.code(),
            ConversionError::NoDepositAddress(_) => "NO_DEPOSIT_ADDRESS",
            ConversionError::UnsupportedNetwork(_) => "UNSUPPORTED_NETWORK",
            ConversionError::Rail(_) => "RAIL_ERROR",
            ConversionError::Stage { .. } => "CONVERSION_FAILED",
            ConversionError::NotFound(_) => "CONVERSION_NOT_FOUND",
            ConversionError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            ConversionError::Ledger(_) => "LEDGER_ERROR",
            ConversionError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ConversionError::BelowMinimum { .. } | ConversionError::InvalidAmount(_) => 400,
            ConversionError::InsufficientBalance
            | ConversionError::Wallet(_)
            | ConversionError::NoDepositAddress(_)
            | ConversionError::UnsupportedNetwork(_) => 422,
            ConversionError::AccountNotFound(_) | ConversionError::NotFound(_) => 404,
            ConversionError::Rail(_) | ConversionError::Stage { .. } => 502,
            ConversionError::InvalidStateTransition { .. }
            | ConversionError::Ledger(_)
            | ConversionError::DatabaseError(_) => 500,
        }
    }
}

impl From<sqlx::Error> for ConversionError {
    fn from(e: sqlx::Error) -> Self {
        ConversionError::DatabaseError(e.to_string())
    }
}

impl From<LedgerError> for ConversionError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance => ConversionError::InsufficientBalance,
            other => ConversionError::Ledger(other),
        }
    }
}
