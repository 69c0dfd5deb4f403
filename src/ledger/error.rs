//! Ledger error types.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Account not found for id {0}")]
    AccountNotFound(i64),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    #[error("Transaction already reversed: {0}")]
    AlreadyReversed(i64),

    /// Unique-key collision on reference/external_id; resolved internally
    /// by returning the original entry, surfaces only on lookup failure.
    #[error("Duplicate idempotency key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl LedgerError {
    /// Error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            LedgerError::AlreadyReversed(_) => "ALREADY_REVERSED",
            LedgerError::DuplicateKey(_) => "DUPLICATE_KEY",
            LedgerError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP status code suggestion for the API layer
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidAmount | LedgerError::DuplicateKey(_) => 400,
            LedgerError::InsufficientBalance | LedgerError::AlreadyReversed(_) => 422,
            LedgerError::AccountNotFound(_) | LedgerError::TransactionNotFound(_) => 404,
            LedgerError::DatabaseError(_) => 500,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_status() {
        assert_eq!(LedgerError::InsufficientBalance.code(), "INSUFFICIENT_BALANCE");
        assert_eq!(LedgerError::InsufficientBalance.http_status(), 422);
        assert_eq!(LedgerError::AccountNotFound(7).http_status(), 404);
        assert_eq!(LedgerError::DatabaseError("x".into()).http_status(), 500);
    }
}
