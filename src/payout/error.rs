//! Payout error types.

use thiserror::Error;

use super::state::PayoutState;
use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Account not found for customer {0}")]
    AccountNotFound(i64),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Payout not found: {0}")]
    NotFound(String),

    /// Raced by a concurrent submission of the same request id; resolved
    /// internally by returning the winner's payout.
    #[error("Duplicate request id: {0}")]
    DuplicateRequest(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: PayoutState, to: PayoutState },

    #[error(transparent)]
    Ledger(LedgerError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl PayoutError {
    pub fn code(&self) -> &'static str {
        match self {
            PayoutError::InvalidAmount => "INVALID_AMOUNT",
            PayoutError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            PayoutError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            PayoutError::NotFound(_) => "PAYOUT_NOT_FOUND",
            PayoutError::DuplicateRequest(_) => "DUPLICATE_REQUEST",
            PayoutError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            PayoutError::Ledger(_) => "LEDGER_ERROR",
            PayoutError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PayoutError::InvalidAmount | PayoutError::DuplicateRequest(_) => 400,
            PayoutError::InsufficientBalance => 422,
            PayoutError::AccountNotFound(_) | PayoutError::NotFound(_) => 404,
            PayoutError::InvalidStateTransition { .. }
            | PayoutError::Ledger(_)
            | PayoutError::DatabaseError(_) => 500,
        }
    }
}

impl From<sqlx::Error> for PayoutError {
    fn from(e: sqlx::Error) -> Self {
        PayoutError::DatabaseError(e.to_string())
    }
}

impl From<LedgerError> for PayoutError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance => PayoutError::InsufficientBalance,
            other => PayoutError::Ledger(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_status() {
        assert_eq!(PayoutError::InsufficientBalance.code(), "INSUFFICIENT_BALANCE");
        assert_eq!(PayoutError::InsufficientBalance.http_status(), 422);
        assert_eq!(PayoutError::InvalidAmount.http_status(), 400);
    }

    #[test]
    fn ledger_insufficient_maps_to_payout_insufficient() {
        let err: PayoutError = LedgerError::InsufficientBalance.into();
        assert!(matches!(err, PayoutError::InsufficientBalance));
    }
}
