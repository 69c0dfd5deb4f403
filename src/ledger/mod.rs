//! Ledger - append-only transaction log plus mutable account balances
//!
//! Every state change in the engine is expressed as one or more ledger
//! entries. Each balance mutation happens inside one database transaction
//! that row-locks the account, re-reads the balance, writes the new balance
//! and inserts exactly one transaction row whose `reference` is unique.
//! Replaying a reference returns the original entry without re-applying
//! the effect; that idempotency is what substitutes for a distributed
//! transaction across the external rails.

pub mod error;
pub mod models;
pub mod service;

pub use error::LedgerError;
pub use models::{Account, LedgerEntry, TxStatus, TxType};
pub use service::LedgerService;
