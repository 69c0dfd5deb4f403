//! Reconciliation: the poller that closes the loop on asynchronous
//! confirmations, and the idempotent webhook handlers.
//!
//! External rails confirm out-of-band - exchange deposits appear in a
//! history poll, bank payouts settle via webhook. This module owns both
//! paths: a single-flight interval worker advancing sell conversions and
//! flagging orphan deposits, and the handlers the (excluded) webhook
//! ingestion layer calls into.

pub mod poller;
pub mod webhook;

pub use poller::{ReconWorker, TickOutcome};
pub use webhook::WebhookIntake;

use thiserror::Error;

use crate::conversion::ConversionError;
use crate::ledger::LedgerError;
use crate::payout::PayoutError;
use crate::rails::RailError;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error(transparent)]
    Rail(#[from] RailError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Payout(#[from] PayoutError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("No customer registered for PIX key")]
    UnknownPixKey,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for ReconError {
    fn from(e: sqlx::Error) -> Self {
        ReconError::DatabaseError(e.to_string())
    }
}
